//! Shared leaf types for blogwire.
//!
//! Nothing in here knows about HTTP clients or blog protocols. These are the
//! small pieces every other crate in the workspace leans on:
//!
//! - [`ErrorLocation`]: file/line/column captured at the point an error is built
//! - [`HttpStatusCode`]: status classification without pulling in an HTTP stack
//! - [`RedactedSecret`]: a credential secret that never shows up in logs
//!
//! ## Architecture
//!
//! - **common** (this crate): leaf types
//! - **blogwire-core**: content values, signing, redirect executor, protocol clients
//! - **blogwire-probe**: wiring binary (config + logging + a client)

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
