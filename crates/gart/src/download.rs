use std::path::PathBuf;

use gart_cache::ValidatorCache;
use gart_net::{Conditional, Net};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::SessionConfig,
    error::{ClientError, ClientResult},
    model::{Asset, AssetFile},
    resolve::file_url,
};

/// Terminal state of one file within a download call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FileStatus {
    /// Body transferred and written to disk.
    Downloaded { bytes: u64 },
    /// Server confirmed the cached validator; nothing written.
    Cached,
    /// This file failed; the others were unaffected.
    Failed {
        #[serde(serialize_with = "serialize_error")]
        reason: ClientError,
    },
}

fn serialize_error<S: serde::Serializer>(err: &ClientError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub filename: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Aggregate result of a download call.
///
/// Outcomes arrive in completion order; call [`Self::sort_by_filename`] when
/// deterministic reporting order matters.
#[derive(Debug, Serialize)]
pub struct DownloadReport {
    pub asset_id: String,
    pub outcomes: Vec<FileOutcome>,
}

impl DownloadReport {
    pub fn downloaded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Downloaded { .. }))
    }

    pub fn cached(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Cached))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// True when the server had nothing newer than the cache: no bytes were
    /// transferred and nothing failed.
    pub fn all_cached(&self) -> bool {
        !self.outcomes.is_empty() && self.cached() == self.outcomes.len()
    }

    pub fn sort_by_filename(&mut self) {
        self.outcomes.sort_by(|a, b| a.filename.cmp(&b.filename));
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Download every file of `asset`, skipping those whose cached validator the
/// server still confirms.
///
/// Per-file work runs concurrently; the only shared budget is the fetch
/// admission ceiling, and the only shared state is the validator cache,
/// whose keys are file-scoped. One file failing never aborts the others;
/// the call itself fails only when every file failed.
pub(crate) async fn download_asset<N: Net>(
    net: &N,
    cache: &ValidatorCache,
    config: &SessionConfig,
    asset: &Asset,
) -> ClientResult<DownloadReport> {
    let dest_dir = config.root_dir.join("content").join(&asset.id);

    let tasks = asset
        .files
        .iter()
        .map(|file| download_file(net, cache, config, &asset.id, file, &dest_dir));
    let statuses = futures::future::join_all(tasks).await;

    let report = DownloadReport {
        asset_id: asset.id.clone(),
        outcomes: asset
            .files
            .iter()
            .zip(statuses)
            .map(|(file, status)| FileOutcome {
                filename: file.name.clone(),
                status,
            })
            .collect(),
    };

    if !report.outcomes.is_empty() && report.failed() == report.outcomes.len() {
        return Err(ClientError::AllFilesFailed {
            asset_id: asset.id.clone(),
            failed: report.failed(),
        });
    }
    Ok(report)
}

/// One file: cache read, conditional fetch, write, cache update — in that
/// order. The cache is only updated after the bytes are on disk, so a
/// failed write never marks the file known-good.
async fn download_file<N: Net>(
    net: &N,
    cache: &ValidatorCache,
    config: &SessionConfig,
    asset_id: &str,
    file: &AssetFile,
    dest_dir: &PathBuf,
) -> FileStatus {
    match try_download_file(net, cache, config, asset_id, file, dest_dir).await {
        Ok(status) => status,
        Err(reason) => {
            debug!(asset_id, filename = %file.name, %reason, "file download failed");
            FileStatus::Failed { reason }
        }
    }
}

async fn try_download_file<N: Net>(
    net: &N,
    cache: &ValidatorCache,
    config: &SessionConfig,
    asset_id: &str,
    file: &AssetFile,
    dest_dir: &PathBuf,
) -> ClientResult<FileStatus> {
    let known = cache.get(asset_id, &file.name).await;
    let url = file_url(config, &file.name)?;

    let fetched = net
        .get_conditional(url, known.as_deref())
        .await
        .map_err(|err| ClientError::net(format!("file {} of asset {asset_id}", file.name), err))?;

    let (bytes, new_validator) = match fetched {
        Conditional::NotModified => {
            debug!(asset_id, filename = %file.name, "validator unchanged, skipping");
            return Ok(FileStatus::Cached);
        }
        // When the download response carries no validator, fall back to the
        // one observed by the describe-time probe.
        Conditional::Fresh { bytes, validator } => {
            let v = validator.unwrap_or_else(|| file.validator.clone());
            (bytes, v)
        }
    };

    // File ids may carry path components; create the full parent chain.
    let dest = dest_dir.join(&file.name);
    let parent = dest.parent().unwrap_or(dest_dir.as_path());
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|err| ClientError::io(parent.to_path_buf(), err))?;
    tokio::fs::write(&dest, &bytes)
        .await
        .map_err(|err| ClientError::io(dest.clone(), err))?;

    // Write succeeded; now the validator may be recorded. A failed record
    // only costs a refetch next run, so it degrades to a warning.
    if let Err(err) = cache.put(asset_id, &file.name, &new_validator).await {
        warn!(asset_id, filename = %file.name, %err, "validator not recorded");
    }

    debug!(asset_id, filename = %file.name, bytes = bytes.len(), "file written");
    Ok(FileStatus::Downloaded {
        bytes: bytes.len() as u64,
    })
}
