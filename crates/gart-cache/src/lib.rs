#![forbid(unsafe_code)]

//! # gart-cache
//!
//! Persistent per-file freshness cache.
//!
//! ## Contract (normative)
//!
//! - A record keyed by `(asset_id, filename)` holds the last validator token
//!   observed for a file that was actually written to disk. Presence means
//!   "previously downloaded, validator known"; absence means "treat as
//!   stale, must fetch".
//! - There is no destination-file existence check and no TTL. Staleness is
//!   decided purely by validator mismatch with the server.
//! - A missing or unreadable store is cold-start, never an error.
//! - Deleting `<root>/cache` is the documented, total invalidation.
//!
//! ## Disk layout
//!
//! One JSON object per asset at `<root>/cache/<asset_id>`, mapping filename
//! to validator. Small, human-inspectable, rebuildable from nothing.

mod error;
mod store;

pub use crate::{
    error::{CacheError, CacheResult},
    store::ValidatorCache,
};
