mod auth;
mod content;
mod document;
mod executor;
mod protocol;
