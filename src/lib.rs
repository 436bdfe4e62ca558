//! ringcache - A byte-budgeted LRU cache with a consistent-hashing peer ring
//!
//! Provides named cache groups that fill themselves from a loader on a miss,
//! and a hash ring that assigns each key to a peer.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod ring;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
