use std::path::PathBuf;

use gart_cache::CacheError;
use gart_net::NetError;
use thiserror::Error;

use crate::page::ParseError;

/// Top-level client errors.
///
/// Fetch and parse failures keep their typed source and gain call context
/// (which asset, which filename, which page) on the way up.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("asset not found: {asset_id}")]
    NotFound { asset_id: String },

    #[error("fetch failed for {context}: {source}")]
    Net {
        context: String,
        #[source]
        source: NetError,
    },

    #[error("unrecognized page structure for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    #[error("cache store failure: {0}")]
    Cache(#[from] CacheError),

    #[error("failed writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("all {failed} file(s) of asset {asset_id} failed to download")]
    AllFilesFailed { asset_id: String, failed: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn net(context: impl Into<String>, source: NetError) -> Self {
        Self::Net {
            context: context.into(),
            source,
        }
    }

    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
