//! Atom Publishing Protocol family: one client, several dialects.

mod client;
mod profile;
mod version;

pub use client::AtomClient;
pub use profile::{
    AtomProfile, BLOGGER_CATEGORY_SCHEME, BLOGGER_KIND_POST, BLOGGER_KIND_SCHEME,
    BloggerAtomProfile, GenericAtomProfile, WsseAtomProfile,
};
pub use version::AtomVersion;
