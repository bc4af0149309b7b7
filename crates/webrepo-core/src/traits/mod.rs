//! Core traits defined in `webrepo-core` and implemented by `webrepo-client`.

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::{EntityRepository, NamedEntityRepository};
