use futures::future::try_join_all;
use gart_net::Net;
use tracing::debug;
use url::Url;

use crate::{
    config::SessionConfig,
    error::{ClientError, ClientResult},
    model::{Asset, AssetFile, AssetType},
    page::PageParser,
};

/// Detail-page URL for an asset id.
pub(crate) fn detail_url(config: &SessionConfig, asset_id: &str) -> ClientResult<Url> {
    config
        .base_url
        .join(&format!("content/{asset_id}"))
        .map_err(|e| ClientError::Config(format!("bad asset id {asset_id}: {e}")))
}

/// Download URL for a file id.
pub(crate) fn file_url(config: &SessionConfig, file_id: &str) -> ClientResult<Url> {
    config
        .base_url
        .join(&format!("sites/default/files/{file_id}"))
        .map_err(|e| ClientError::Config(format!("bad file id {file_id}: {e}")))
}

/// Fetch and parse one detail page into an [`Asset`].
///
/// Always re-fetches; descriptions are never cached. The detail GET is
/// unconditional, then one HEAD probe per file recovers validator and byte
/// size. Probes run concurrently and draw from the session's shared
/// admission ceiling.
pub(crate) async fn describe_asset<N: Net, P: PageParser>(
    net: &N,
    parser: &P,
    config: &SessionConfig,
    asset_id: &str,
) -> ClientResult<Asset> {
    let url = detail_url(config, asset_id)?;
    debug!(asset_id, %url, "describing asset");

    let body = net.get_bytes(url).await.map_err(|err| {
        if err.status_code() == Some(404) {
            ClientError::NotFound {
                asset_id: asset_id.to_string(),
            }
        } else {
            ClientError::net(format!("asset {asset_id}"), err)
        }
    })?;
    let body = String::from_utf8_lossy(&body);

    let page = parser
        .parse_asset_detail(&body)
        .map_err(|err| ClientError::parse(format!("asset {asset_id}"), err))?;

    let probes = page
        .file_ids
        .iter()
        .map(|file_id| probe_file(net, config, asset_id, file_id));
    let files = try_join_all(probes).await?;

    Ok(Asset {
        id: asset_id.to_string(),
        kind: AssetType::from_site_label(&page.type_label),
        author: page.author,
        favorites: page.favorites,
        tags: dedup_preserving_order(page.tags),
        licenses: page.licenses,
        attribution: page.attribution,
        files,
    })
}

/// HEAD a file to learn its current validator and size.
async fn probe_file<N: Net>(
    net: &N,
    config: &SessionConfig,
    asset_id: &str,
    file_id: &str,
) -> ClientResult<AssetFile> {
    let url = file_url(config, file_id)?;
    let context = || format!("file {file_id} of asset {asset_id}");

    let headers = net
        .head(url)
        .await
        .map_err(|err| ClientError::net(context(), err))?;

    let validator = headers
        .get("etag")
        .map(gart_net::normalize_validator)
        .ok_or_else(|| {
            ClientError::net(context(), gart_net::NetError::malformed("missing ETag"))
        })?;
    let size = headers
        .get("content-length")
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| {
            ClientError::net(
                context(),
                gart_net::NetError::malformed("missing or invalid Content-Length"),
            )
        })?;

    Ok(AssetFile {
        name: file_id.to_string(),
        size,
        validator,
    })
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
