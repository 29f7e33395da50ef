use thiserror::Error;

use crate::model::AssetSummary;

/// Raw fields extracted from one asset detail page, before the resolver
/// turns them into an [`crate::Asset`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailPage {
    pub author: Option<String>,
    pub type_label: String,
    pub licenses: Vec<String>,
    pub tags: Vec<String>,
    pub favorites: u32,
    pub attribution: Option<String>,
    /// File ids in document order, percent-decoded.
    pub file_ids: Vec<String>,
}

/// One parsed page of search results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub entries: Vec<AssetSummary>,
    pub has_next: bool,
}

/// Page body did not match the expected structure. Signals site-markup
/// drift, not a usage error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing section: {0}")]
    MissingSection(&'static str),

    #[error("invalid {what}: {detail}")]
    Invalid { what: &'static str, detail: String },
}

impl ParseError {
    pub fn invalid(what: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            detail: detail.into(),
        }
    }
}

/// The markup seam.
///
/// The core never looks inside a page body; any change to the site's HTML is
/// isolated behind this trait. [`crate::SitePages`] is the shipped
/// implementation; tests substitute canned parsers.
pub trait PageParser: Send + Sync {
    fn parse_asset_detail(&self, body: &str) -> Result<DetailPage, ParseError>;
    fn parse_search_page(&self, body: &str) -> Result<SearchPage, ParseError>;
}
