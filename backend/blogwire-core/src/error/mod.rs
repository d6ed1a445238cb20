pub mod auth;
pub mod config;
pub mod content;
pub mod document;
pub mod executor;
pub mod protocol;

pub use auth::AuthError;
pub use config::ConfigError;
pub use content::ContentError;
pub use document::DocumentError;
pub use executor::ExecutorError;
pub use protocol::ProtocolError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
