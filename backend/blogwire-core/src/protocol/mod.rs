//! Uniform client surface over the supported blog services.
//!
//! Each service is a [`ProtocolClient`] variant with a fixed
//! [`ProtocolCapabilities`] set. Variants are chosen once, at construction,
//! by [`build_client`]; nothing downstream inspects the concrete type.

pub mod atom;
mod factory;
pub mod json;
mod types;

pub use factory::{ProtocolKind, build_client};
pub use types::{BlogInfo, BlogPost, Category, PostResult, ProtocolCapabilities};

use crate::error::ProtocolError;

use async_trait::async_trait;

#[async_trait]
pub trait ProtocolClient: Send + Sync {
    /// Short name used in logs and [`ProtocolError::UnsupportedOperation`].
    fn protocol_name(&self) -> &'static str;

    fn capabilities(&self) -> &ProtocolCapabilities;

    /// `Ok(false)` when the service rejects the credentials (401/403).
    async fn verify_credentials(&self) -> Result<bool, ProtocolError>;

    async fn get_categories(&self, blog_id: &str) -> Result<Vec<Category>, ProtocolError>;

    async fn get_blogs(&self) -> Result<Vec<BlogInfo>, ProtocolError>;

    async fn create_or_update_post(
        &self,
        blog_id: &str,
        post: &BlogPost,
        is_new: bool,
    ) -> Result<PostResult, ProtocolError>;

    async fn get_recent_posts(
        &self,
        _blog_id: &str,
        _max_posts: usize,
    ) -> Result<Vec<BlogPost>, ProtocolError> {
        Err(ProtocolError::unsupported(self.protocol_name(), "get_recent_posts"))
    }

    async fn get_post(&self, _blog_id: &str, _post_id: &str) -> Result<BlogPost, ProtocolError> {
        Err(ProtocolError::unsupported(self.protocol_name(), "get_post"))
    }

    async fn delete_post(&self, _blog_id: &str, _post_id: &str) -> Result<(), ProtocolError> {
        Err(ProtocolError::unsupported(self.protocol_name(), "delete_post"))
    }
}
