#![forbid(unsafe_code)]

//! # gart
//!
//! Client for searching, describing, and downloading assets from
//! OpenGameArt.org.
//!
//! ## Shape
//!
//! [`Session`] is the composition root. It binds one [`SessionConfig`], one
//! bounded fetch pool ([`gart_net::BoundedNet`]), one markup parser behind
//! the [`PageParser`] seam, and one persistent validator cache
//! ([`gart_cache::ValidatorCache`]). Its surface is three operations:
//!
//! - [`Session::describe`] — one detail page fetch, parsed into an
//!   immutable [`Asset`];
//! - [`Session::search`] — a lazy, finite stream of [`AssetSummary`]
//!   entries, paged on demand;
//! - [`Session::download`] — per-file conditional fetches against the
//!   validator cache, aggregated into a [`DownloadReport`].
//!
//! ## Freshness model
//!
//! A file is skipped iff the server confirms (HTTP 304) the validator token
//! recorded at its last successful download. There is no TTL, no
//! destination-file existence check, and no describe-level caching; deleting
//! `<root>/cache` is the documented way to forget everything.

mod config;
mod download;
mod error;
mod model;
mod page;
mod query;
mod resolve;
mod search;
mod session;
mod site;

pub use crate::{
    config::{SessionConfig, DEFAULT_BASE_URL},
    download::{DownloadReport, FileOutcome, FileStatus},
    error::{ClientError, ClientResult},
    model::{Asset, AssetFile, AssetSummary, AssetType},
    page::{DetailPage, PageParser, ParseError, SearchPage},
    query::{SearchQuery, SortBy, TagMode},
    session::Session,
    site::SitePages,
};

// The fetch boundary is part of the public API: callers plug in their own
// transports for instrumentation.
pub use gart_net::{BoundedNet, Conditional, Headers, HttpClient, Net, NetError, NetOptions};
