//! RocketShoes storefront library.
//!
//! Everything behind the storefront UI lives here as a library so it can be
//! driven from the CLI and tested against fake APIs:
//!
//! - [`cart`]: the persisted shopping cart and its stock-checked operations
//! - [`catalog`]: product and stock lookups
//! - [`content`]: the blog, backed by a headless content API
//! - [`gallery`]: paginated image browsing and uploads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod content;
pub mod gallery;
pub mod http;
pub mod notify;
pub mod telemetry;

pub use http::ApiError;
