//! Group Module
//!
//! Named cache groups, their loaders and the registry that resolves them.

mod cache_group;
mod getter;
mod registry;

pub use cache_group::{Group, GroupBuilder};
pub use getter::{Getter, GetterFn};
pub use registry::GroupRegistry;
