use std::sync::Arc;

use futures::Stream;
use gart_cache::ValidatorCache;
use gart_net::{BoundedNet, HttpClient, Net, NetExt, NetOptions};
use tracing::debug;

use crate::{
    config::SessionConfig,
    download::{self, DownloadReport},
    error::ClientResult,
    model::{Asset, AssetSummary},
    page::PageParser,
    query::SearchQuery,
    resolve,
    search::search_stream,
    site::SitePages,
};

/// Composition root: one configuration, one shared admission ceiling, one
/// validator cache.
///
/// Every operation of one session draws fetches from the same bounded pool,
/// so a running download naturally throttles a concurrent search and vice
/// versa.
///
/// ```no_run
/// # async fn run() -> Result<(), gart::ClientError> {
/// use gart::{Session, SessionConfig};
///
/// let session = Session::new(SessionConfig::default());
/// let asset = session.describe("imminent-threat").await?;
/// println!("{}", asset.summary_line());
/// let report = session.download(&asset).await?;
/// println!("{} downloaded, {} cached", report.downloaded(), report.cached());
/// # Ok(())
/// # }
/// ```
pub struct Session<N = BoundedNet<HttpClient>, P = SitePages> {
    config: SessionConfig,
    net: N,
    parser: Arc<P>,
    cache: ValidatorCache,
}

impl Session {
    /// Production wiring: reqwest client behind the configured ceiling and
    /// the site markup parser.
    pub fn new(config: SessionConfig) -> Self {
        let net = HttpClient::new(NetOptions::default()).with_limit(config.max_conns);
        Self::with_parts(config, net, SitePages)
    }
}

impl<N, P> Session<N, P>
where
    N: Net + Clone + 'static,
    P: PageParser + 'static,
{
    /// Custom wiring for tests and instrumentation: any [`Net`] and any
    /// [`PageParser`].
    pub fn with_parts(config: SessionConfig, net: N, parser: P) -> Self {
        let cache = ValidatorCache::open(&config.root_dir);
        debug!(root = %config.root_dir.display(), max_conns = config.max_conns, "session ready");
        Self {
            config,
            net,
            parser: Arc::new(parser),
            cache,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Fetch and parse the asset's detail page. Always hits the network;
    /// descriptions are never cached.
    pub async fn describe(&self, asset_id: &str) -> ClientResult<Asset> {
        resolve::describe_asset(&self.net, self.parser.as_ref(), &self.config, asset_id).await
    }

    /// Stream search hits page by page. Lazy and finite; dropping the
    /// stream stops further page fetches. See [`SearchQuery`] for filters.
    pub fn search(&self, query: SearchQuery) -> impl Stream<Item = ClientResult<AssetSummary>> + Send {
        search_stream(
            self.net.clone(),
            Arc::clone(&self.parser),
            self.config.clone(),
            query,
        )
    }

    /// Download the asset's files into `<root>/content/<id>/`, skipping
    /// files whose cached validator the server still confirms.
    pub async fn download(&self, asset: &Asset) -> ClientResult<DownloadReport> {
        download::download_asset(&self.net, &self.cache, &self.config, asset).await
    }

    /// Describe then download: the command surface's download path.
    pub async fn download_by_id(&self, asset_id: &str) -> ClientResult<DownloadReport> {
        let asset = self.describe(asset_id).await?;
        self.download(&asset).await
    }
}
