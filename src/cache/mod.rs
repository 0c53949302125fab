//! Cache module - caching layer over Moka.
//!
//! Repositories and the permission checker ask the `CacheRegistry` for a
//! named `TypedCache` and share it across clones of the application state.

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
