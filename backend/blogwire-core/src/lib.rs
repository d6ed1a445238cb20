//! Client layer for blog-publishing wire protocols.
//!
//! One [`protocol::ProtocolClient`] surface over several services (Atom
//! Publishing Protocol dialects, WSSE-authenticated Atom feeds, a JSON REST
//! API). Every operation goes through the same three pieces:
//!
//! - [`auth`]: signers that attach auth headers to each outgoing attempt
//! - [`executor`]: a bounded redirect follower that keeps caller query strings
//! - [`content`]: prose values readable as text, HTML or XHTML
//!
//! ```text
//! ProtocolClient -> SignedRequest -> RequestExecutor -> Transport
//!        ^                                                  |
//!        +------------- ContentValue <---- response --------+
//! ```

pub mod auth;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod executor;
pub mod protocol;

#[cfg(test)]
mod tests;

/// Default `User-Agent` sent by [`executor::ReqwestTransport`].
pub const BLOGWIRE_USER_AGENT: &str =
    const_format::concatcp!("blogwire/", env!("CARGO_PKG_VERSION"));
