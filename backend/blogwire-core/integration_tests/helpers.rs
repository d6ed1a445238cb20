//! Shared fixtures for the integration tests.

use blogwire_core::auth::{CredentialStore, Credentials, StaticCredentialStore};
use blogwire_core::executor::{ReqwestTransport, RequestExecutor, TransportSettings};

use std::sync::Arc;

pub const IDENTITY: &str = "alice";
pub const SECRET: &str = "s3cret";
pub const TAG_SCHEME: &str = "http://example.com/tags";

pub fn executor() -> RequestExecutor {
    let transport = ReqwestTransport::new(&TransportSettings::default()).expect("client builds");
    RequestExecutor::new(Arc::new(transport))
}

pub fn credentials() -> Credentials {
    Credentials::new(IDENTITY, SECRET)
}

pub fn credential_store() -> Arc<dyn CredentialStore> {
    Arc::new(StaticCredentialStore::new(credentials()))
}

/// Atom 1.0 service document with one entry collection and one media collection.
pub fn service_document() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<service xmlns="http://www.w3.org/2007/app" xmlns:atom="http://www.w3.org/2005/Atom">
  <workspace>
    <atom:title>My Site</atom:title>
    <collection href="/collections/posts">
      <atom:title>Posts</atom:title>
      <accept>application/atom+xml;type=entry</accept>
      <categories fixed="yes" scheme="{TAG_SCHEME}">
        <atom:category term="rust" label="Rust"/>
        <atom:category term="go" scheme="http://other"/>
      </categories>
      <categories href="/cats"/>
      <categories href="/cats"/>
    </collection>
    <collection href="/collections/media">
      <atom:title>Media</atom:title>
      <accept>image/png</accept>
    </collection>
  </workspace>
</service>"#
    )
}

pub fn feed_document(title: &str, homepage: &str) -> String {
    format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>{title}</title><link rel="self" href="/self"/><link rel="alternate" type="text/html; charset=utf-8" href="{homepage}"/></feed>"#
    )
}

pub fn entry_document(id: &str, edit_href: &str, title: &str) -> String {
    format!(
        r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:app="http://www.w3.org/2007/app">
  <id>{id}</id>
  <title type="text">{title}</title>
  <content type="html">&lt;p&gt;Body of {title}&lt;/p&gt;</content>
  <published>2024-01-02T03:04:05Z</published>
  <category scheme="{TAG_SCHEME}" term="rust" label="Rust"/>
  <link rel="edit" href="{edit_href}"/>
  <link rel="alternate" type="text/html" href="https://blog.example.com/{id}"/>
</entry>"#
    )
}
