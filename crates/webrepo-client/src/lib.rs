//! # webrepo-client
//!
//! HTTP-backed implementations of the WebRepo repository contracts: a
//! typed CRUD and paging facade over a REST endpoint convention, built on
//! a connection-reusing `reqwest` client.
//!
//! [`WebRepository`] addresses entities by key; [`WebNamedRepository`]
//! composes over it and adds name-addressed lookup and deletion for
//! entities with a unique human-readable name.

pub mod http;
pub mod named;
pub mod observer;
pub mod repository;

pub use named::WebNamedRepository;
pub use observer::{NoopObserver, TracingObserver};
pub use repository::WebRepository;
