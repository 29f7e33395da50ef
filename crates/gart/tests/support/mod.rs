//! Scripted [`Net`] implementation and page fixtures shared by the
//! integration tests. Routes are matched by substring, most specific first,
//! so tests do not have to reproduce exact query-string encodings.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use bytes::Bytes;
use gart::{Conditional, Headers, Net, NetError};
use url::Url;

#[derive(Clone)]
pub enum Route {
    /// Plain page body (detail or search results).
    Page(String),
    /// Downloadable file with a current validator and an advertised size.
    File {
        body: String,
        validator: String,
        size: u64,
    },
    /// Fixed failure status.
    Status(u16),
}

#[derive(Clone, Default)]
pub struct ScriptedNet {
    routes: Arc<Mutex<Vec<(String, Route)>>>,
    pub page_gets: Arc<AtomicUsize>,
    pub body_gets: Arc<AtomicUsize>,
    pub heads: Arc<AtomicUsize>,
}

impl ScriptedNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route; earlier registrations win, so add the most
    /// specific keys first.
    pub fn route(&self, key: &str, route: Route) {
        self.routes.lock().unwrap().push((key.to_string(), route));
    }

    /// Re-script an existing key (e.g. rotate a file's validator).
    pub fn replace(&self, key: &str, route: Route) {
        let mut routes = self.routes.lock().unwrap();
        routes.retain(|(k, _)| k != key);
        routes.insert(0, (key.to_string(), route));
    }

    fn lookup(&self, url: &Url) -> Option<Route> {
        let target = url.as_str();
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| target.contains(key.as_str()))
            .map(|(_, route)| route.clone())
    }

    pub fn pages_fetched(&self) -> usize {
        self.page_gets.load(Ordering::SeqCst)
    }

    pub fn bodies_fetched(&self) -> usize {
        self.body_gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Net for ScriptedNet {
    async fn get_bytes(&self, url: Url) -> Result<Bytes, NetError> {
        match self.lookup(&url) {
            Some(Route::Page(body)) => {
                self.page_gets.fetch_add(1, Ordering::SeqCst);
                Ok(Bytes::from(body))
            }
            Some(Route::File { body, .. }) => {
                self.body_gets.fetch_add(1, Ordering::SeqCst);
                Ok(Bytes::from(body))
            }
            Some(Route::Status(status)) => Err(NetError::status(status, &url)),
            None => Err(NetError::status(404, &url)),
        }
    }

    async fn get_conditional(
        &self,
        url: Url,
        validator: Option<&str>,
    ) -> Result<Conditional, NetError> {
        match self.lookup(&url) {
            Some(Route::File {
                body,
                validator: current,
                ..
            }) => {
                if validator == Some(current.as_str()) {
                    return Ok(Conditional::NotModified);
                }
                self.body_gets.fetch_add(1, Ordering::SeqCst);
                Ok(Conditional::Fresh {
                    bytes: Bytes::from(body),
                    validator: Some(current),
                })
            }
            Some(Route::Page(body)) => {
                self.body_gets.fetch_add(1, Ordering::SeqCst);
                Ok(Conditional::Fresh {
                    bytes: Bytes::from(body),
                    validator: None,
                })
            }
            Some(Route::Status(status)) => Err(NetError::status(status, &url)),
            None => Err(NetError::status(404, &url)),
        }
    }

    async fn head(&self, url: Url) -> Result<Headers, NetError> {
        match self.lookup(&url) {
            Some(Route::File {
                validator, size, ..
            }) => {
                self.heads.fetch_add(1, Ordering::SeqCst);
                let mut headers = Headers::new();
                headers.insert("etag", format!("\"{validator}\""));
                headers.insert("content-length", size.to_string());
                Ok(headers)
            }
            Some(Route::Page(_)) => Ok(Headers::new()),
            Some(Route::Status(status)) => Err(NetError::status(status, &url)),
            None => Err(NetError::status(404, &url)),
        }
    }
}

// ============================================================================
// Page fixtures (site markup shape)
// ============================================================================

pub fn detail_page(
    type_label: &str,
    author: &str,
    favorites: u32,
    tags: &[&str],
    licenses: &[&str],
    file_ids: &[&str],
) -> String {
    let tag_links = tags
        .iter()
        .map(|t| format!(r#"<a href="/t/{t}">{t}</a> "#))
        .collect::<String>();
    let license_spans = licenses
        .iter()
        .map(|l| format!(r#"<span class="license-name">{l}</span>"#))
        .collect::<String>();
    let file_links = file_ids
        .iter()
        .map(|f| {
            let encoded = f.replace(' ', "%20");
            format!(
                r#"<span class="file"><a href="/sites/default/files/{encoded}">{f}</a></span>"#
            )
        })
        .collect::<String>();
    format!(
        r#"<html><body>
        <div class="field field-name-author-submitter"><a href="/users/{author}">{author}</a></div>
        <div class="field field-name-field-art-type"><a href="/art-search">{type_label}</a></div>
        <div class="field field-name-field-art-licenses">{license_spans}</div>
        <div class="field field-name-field-art-tags">{tag_links}</div>
        <div class="field field-name-favorites"><div class="field-item">{favorites}</div></div>
        <div class="field field-name-field-art-files">{file_links}</div>
        </body></html>"#
    )
}

pub fn search_tile(id: &str, title: &str, tags: &[&str]) -> String {
    let tag_links = tags
        .iter()
        .map(|t| format!(r#"<a href="/t/{t}">{t}</a>"#))
        .collect::<String>();
    format!(
        r#"<span class="art-preview-title"><a href="/content/{id}">{title}</a></span>
           <div class="field-name-field-art-tags">{tag_links}</div>"#
    )
}

pub fn search_page(tiles: &[String], has_next: bool) -> String {
    let pager = if has_next {
        r#"<li class="pager-next"><a href="?page=1">next</a></li>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><div class="view view-display-id-search_art_advanced">{}</div>{pager}</body></html>"#,
        tiles.concat()
    )
}
