use std::{collections::VecDeque, sync::Arc};

use futures::Stream;
use gart_net::Net;
use tracing::debug;
use url::Url;

use crate::{
    config::SessionConfig,
    error::{ClientError, ClientResult},
    model::AssetSummary,
    page::PageParser,
    query::{SearchQuery, TagMode},
};

/// Pure AND-mode membership test: does the summary carry every requested
/// tag? OR mode (and an empty tag filter) accepts everything the server
/// returned.
pub(crate) fn matches_tag_filter(query: &SearchQuery, summary: &AssetSummary) -> bool {
    match query.tag_mode {
        TagMode::Or => true,
        TagMode::And => query
            .tags
            .iter()
            .all(|wanted| summary.tags.iter().any(|t| t == wanted)),
    }
}

fn search_url(config: &SessionConfig, query: &SearchQuery, page: u32) -> ClientResult<Url> {
    let mut url = config
        .base_url
        .join("art-search-advanced")
        .map_err(|e| ClientError::Config(format!("bad base url: {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query.to_query_pairs(page) {
            pairs.append_pair(&k, &v);
        }
    }
    Ok(url)
}

struct Cursor<N, P> {
    net: N,
    parser: Arc<P>,
    config: SessionConfig,
    query: SearchQuery,
    page: u32,
    pages_fetched: u32,
    done: bool,
    pending: VecDeque<AssetSummary>,
}

/// Lazy, finite, non-restartable stream of search hits.
///
/// Pages are fetched strictly one at a time, only when the consumer polls
/// past the buffered entries. Dropping the stream between polls abandons the
/// run; no further page is fetched. A fresh call re-runs from page one.
///
/// In AND tag mode the server sees the OR-combined superset query and
/// [`matches_tag_filter`] enforces the intersection here, so consumers
/// observe native-AND semantics either way.
pub(crate) fn search_stream<N, P>(
    net: N,
    parser: Arc<P>,
    config: SessionConfig,
    query: SearchQuery,
) -> impl Stream<Item = ClientResult<AssetSummary>> + Send
where
    N: Net + Clone + 'static,
    P: PageParser + 'static,
{
    let cursor = Cursor {
        net,
        parser,
        config,
        query,
        page: 0,
        pages_fetched: 0,
        done: false,
        pending: VecDeque::new(),
    };

    futures::stream::try_unfold(cursor, |mut cur| async move {
        loop {
            if let Some(item) = cur.pending.pop_front() {
                return Ok(Some((item, cur)));
            }
            if cur.done {
                return Ok(None);
            }
            if let Some(limit) = cur.query.page_limit {
                if cur.pages_fetched >= limit {
                    return Ok(None);
                }
            }

            let page = cur.page;
            let url = search_url(&cur.config, &cur.query, page)?;
            debug!(page, %url, "fetching search page");
            let body = cur
                .net
                .get_bytes(url)
                .await
                .map_err(|err| ClientError::net(format!("search page {page}"), err))?;
            let parsed = cur
                .parser
                .parse_search_page(&String::from_utf8_lossy(&body))
                .map_err(|err| ClientError::parse(format!("search page {page}"), err))?;

            cur.page += 1;
            cur.pages_fetched += 1;
            if parsed.entries.is_empty() || !parsed.has_next {
                cur.done = true;
            }
            cur.pending.extend(
                parsed
                    .entries
                    .into_iter()
                    .filter(|summary| matches_tag_filter(&cur.query, summary)),
            );
        }
    })
}
