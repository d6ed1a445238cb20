//! Blogger v3 style JSON REST client.
//!
//! Endpoints are path segments appended to the base URL:
//!
//! - `users/self`: credential check
//! - `users/self/blogs`: blog list
//! - `blogs/{blog}/posts[/{post}]`: post CRUD
//!
//! An optional API key rides along as `key=` on every request. The
//! executor's query merge keeps it when a redirect drops the query.

use crate::auth::{AuthSigner, BearerSigner, CredentialStore};
use crate::content::ContentValue;
use crate::error::ProtocolError;
use crate::executor::{HttpResponse, RequestExecutor, SignedRequest};
use crate::protocol::{
    BlogInfo, BlogPost, Category, PostResult, ProtocolCapabilities, ProtocolClient,
};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";
const PROTOCOL_NAME: &str = "json-rest";

#[derive(Debug, Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct BlogResource {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    url: Option<String>,
    #[serde(default, skip_serializing)]
    etag: Option<String>,
    #[serde(default, skip_serializing)]
    status: Option<String>,
}

impl PostResource {
    fn into_post(self) -> BlogPost {
        let mut post = BlogPost::new(self.title, ContentValue::html(self.content));
        post.id = self.id;
        post.categories = self
            .labels
            .into_iter()
            .map(|label| Category::new(label.clone(), label))
            .collect();
        post.date_published = self.published;
        post.permalink = self.url;
        post.etag = self.etag;
        post.publish = !self.status.is_some_and(|s| s.eq_ignore_ascii_case("draft"));
        post
    }
}

pub struct JsonRestClient {
    base_url: Url,
    api_key: Option<String>,
    executor: RequestExecutor,
    credentials: Arc<dyn CredentialStore>,
    signer: Arc<dyn AuthSigner>,
    capabilities: ProtocolCapabilities,
}

impl JsonRestClient {
    pub fn new(
        mut base_url: Url,
        api_key: Option<String>,
        executor: RequestExecutor,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            api_key,
            executor,
            credentials,
            signer: Arc::new(BearerSigner),
            capabilities: ProtocolCapabilities {
                supports_categories: false,
                supports_multiple_categories: false,
                supports_new_categories: false,
                supports_post_as_draft: true,
                supports_custom_date: true,
                supports_excerpt: false,
                supports_slug: false,
            },
        }
    }

    /// Base URL plus `segments`, each percent-encoded as exactly one path
    /// segment, so ids cannot walk out of their resource.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ProtocolError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ProtocolError::invalid_request(format!(
                "'{bad}' is not a valid resource id"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProtocolError::invalid_request("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn request(&self, method: Method) -> Result<SignedRequest, ProtocolError> {
        let credentials = self.credentials.credentials()?;
        Ok(SignedRequest::new(method, Arc::clone(&self.signer), credentials)
            .with_accept(JSON_CONTENT_TYPE))
    }

    async fn send(&self, uri: &Url, request: SignedRequest) -> Result<HttpResponse, ProtocolError> {
        let response = self.executor.execute(uri, |hop| request.build(hop)).await?;
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        uri: &Url,
        request: SignedRequest,
    ) -> Result<(T, HttpResponse), ProtocolError> {
        let response = self.send(uri, request).await?;
        let value = decode(uri, &response)?;
        Ok((value, response))
    }

    fn post_body(&self, post: &BlogPost) -> Result<Vec<u8>, ProtocolError> {
        let resource = PostResource {
            id: post.id.clone(),
            title: post.title.clone(),
            content: post.contents.to_html().unwrap_or_default(),
            labels: post.categories.iter().map(|c| c.name.clone()).collect(),
            published: post.date_published,
            ..PostResource::default()
        };
        Ok(serde_json::to_vec(&resource)?)
    }
}

fn decode<T: DeserializeOwned>(uri: &Url, response: &HttpResponse) -> Result<T, ProtocolError> {
    if !response.status().is_success() {
        return Err(ProtocolError::http_status(uri.as_str(), response.status(), &response.text()));
    }
    response
        .json()
        .map_err(|e| ProtocolError::remote(uri.as_str(), format!("malformed JSON: {e}")))
}

#[async_trait]
impl ProtocolClient for JsonRestClient {
    fn protocol_name(&self) -> &'static str {
        PROTOCOL_NAME
    }

    fn capabilities(&self) -> &ProtocolCapabilities {
        &self.capabilities
    }

    async fn verify_credentials(&self) -> Result<bool, ProtocolError> {
        let uri = self.endpoint(&["users", "self"], &[])?;
        let response = self.send(&uri, self.request(Method::GET)?).await?;
        if response.status().is_auth_rejection() {
            debug!("{PROTOCOL_NAME} rejected credentials for {}", self.base_url);
            return Ok(false);
        }
        decode::<serde_json::Value>(&uri, &response)?;
        Ok(true)
    }

    async fn get_categories(&self, _blog_id: &str) -> Result<Vec<Category>, ProtocolError> {
        Err(ProtocolError::unsupported(PROTOCOL_NAME, "get_categories"))
    }

    async fn get_blogs(&self) -> Result<Vec<BlogInfo>, ProtocolError> {
        let uri = self.endpoint(&["users", "self", "blogs"], &[])?;
        let (list, _): (ItemList<BlogResource>, _) =
            self.send_json(&uri, self.request(Method::GET)?).await?;

        Ok(list
            .items
            .into_iter()
            .map(|blog| BlogInfo {
                id: blog.id,
                name: blog.name,
                homepage_url: blog.url,
            })
            .collect())
    }

    async fn create_or_update_post(
        &self,
        blog_id: &str,
        post: &BlogPost,
        is_new: bool,
    ) -> Result<PostResult, ProtocolError> {
        let draft = if post.publish {
            Vec::new()
        } else {
            vec![("isDraft", "true".to_string())]
        };

        let (uri, request) = if is_new {
            let uri = self.endpoint(&["blogs", blog_id, "posts"], &draft)?;
            (uri, self.request(Method::POST)?)
        } else {
            let id = post
                .id
                .as_deref()
                .ok_or_else(|| ProtocolError::invalid_request("updating a post requires its id"))?;
            let uri = self.endpoint(&["blogs", blog_id, "posts", id], &[])?;
            (uri, self.request(Method::PUT)?.with_if_match(post.etag.as_deref()))
        };
        let request = request.with_body(JSON_CONTENT_TYPE, self.post_body(post)?);

        let (resource, response): (PostResource, _) = self.send_json(&uri, request).await?;
        let remote_post = resource.into_post();
        let post_id = remote_post
            .id
            .clone()
            .ok_or_else(|| ProtocolError::remote(uri.as_str(), "response post has no id"))?;

        Ok(PostResult {
            post_id,
            etag: response.etag().or_else(|| remote_post.etag.clone()),
            remote_post: Some(remote_post),
        })
    }

    async fn get_recent_posts(
        &self,
        blog_id: &str,
        max_posts: usize,
    ) -> Result<Vec<BlogPost>, ProtocolError> {
        let uri = self.endpoint(
            &["blogs", blog_id, "posts"],
            &[("maxResults", max_posts.to_string())],
        )?;
        let (list, _): (ItemList<PostResource>, _) =
            self.send_json(&uri, self.request(Method::GET)?).await?;

        Ok(list
            .items
            .into_iter()
            .take(max_posts)
            .map(PostResource::into_post)
            .collect())
    }

    async fn get_post(&self, blog_id: &str, post_id: &str) -> Result<BlogPost, ProtocolError> {
        let uri = self.endpoint(&["blogs", blog_id, "posts", post_id], &[])?;
        let (resource, response): (PostResource, _) =
            self.send_json(&uri, self.request(Method::GET)?).await?;

        let mut post = resource.into_post();
        if let Some(etag) = response.etag() {
            post.etag = Some(etag);
        }
        Ok(post)
    }

    async fn delete_post(&self, blog_id: &str, post_id: &str) -> Result<(), ProtocolError> {
        let uri = self.endpoint(&["blogs", blog_id, "posts", post_id], &[])?;
        let response = self.send(&uri, self.request(Method::DELETE)?).await?;

        let status = response.status();
        if status.is_success() || status.is_gone() {
            return Ok(());
        }
        Err(ProtocolError::http_status(uri.as_str(), status, &response.text()))
    }
}
