//! # webrepo-core
//!
//! Core crate for WebRepo. Contains the repository contracts, the remote
//! endpoint configuration schema, pagination types, the observer
//! capability, and the unified error system.
//!
//! This crate has **no** internal dependencies on other WebRepo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::ClientError;
pub use result::ClientResult;
