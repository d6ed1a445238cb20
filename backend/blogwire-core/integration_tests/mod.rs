mod auth;
mod config;
mod error;
mod executor;
mod helpers;
mod protocol;
