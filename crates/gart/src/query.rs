use crate::model::AssetType;

/// How multiple tag filters combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagMode {
    /// Any requested tag matches (server-native).
    #[default]
    Or,
    /// Every requested tag must be present. The server is queried with the
    /// OR superset and the paginator post-filters client-side.
    And,
}

/// Result ordering understood by the site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Favorites,
    Created,
    Views,
}

impl SortBy {
    fn site_value(self) -> &'static str {
        match self {
            Self::Favorites => "count",
            Self::Created => "created",
            Self::Views => "totalcount",
        }
    }
}

/// An immutable search, consumed once per paginator run.
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub keys: Option<String>,
    pub title: Option<String>,
    pub submitter: Option<String>,
    pub types: Vec<AssetType>,
    pub tags: Vec<String>,
    pub tag_mode: TagMode,
    pub license: Option<String>,
    pub sort_by: SortBy,
    pub descending: bool,
    /// Stop after this many result pages, regardless of server paging.
    pub page_limit: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self {
            descending: true,
            ..Self::default()
        }
    }

    pub fn with_keys(mut self, keys: impl Into<String>) -> Self {
        self.keys = Some(keys.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_submitter(mut self, submitter: impl Into<String>) -> Self {
        self.submitter = Some(submitter.into());
        self
    }

    pub fn with_type(mut self, kind: AssetType) -> Self {
        self.types.push(kind);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tag_mode(mut self, mode: TagMode) -> Self {
        self.tag_mode = mode;
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, descending: bool) -> Self {
        self.sort_by = sort_by;
        self.descending = descending;
        self
    }

    pub fn with_page_limit(mut self, pages: u32) -> Self {
        self.page_limit = Some(pages);
        self
    }

    /// Query-string pairs for one result page.
    ///
    /// AND mode is deliberately sent as `or`: the server only sees the
    /// superset query and the paginator enforces the intersection.
    pub(crate) fn to_query_pairs(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();

        pairs.push(("keys".into(), self.keys.clone().unwrap_or_default()));
        if let Some(title) = &self.title {
            pairs.push(("title".into(), title.clone()));
        }
        if let Some(submitter) = &self.submitter {
            pairs.push(("name".into(), submitter.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("field_art_tags_tid_op".into(), "or".into()));
            pairs.push(("field_art_tags_tid".into(), self.tags.join(" ")));
        }
        for kind in &self.types {
            for id in type_search_values(*kind) {
                pairs.push(("field_art_type_tid[]".into(), (*id).into()));
            }
        }
        if let Some(license) = &self.license {
            if let Some(id) = license_search_value(license) {
                pairs.push(("field_art_licenses_tid[]".into(), id.into()));
            }
        }
        pairs.push(("sort_by".into(), self.sort_by.site_value().into()));
        pairs.push((
            "sort_order".into(),
            if self.descending { "DESC" } else { "ASC" }.into(),
        ));
        if page > 0 {
            pairs.push(("page".into(), page.to_string()));
        }
        pairs
    }
}

/// The site's numeric term ids for each asset category.
///
/// `Other` covers everything the category enum folds together, so it expands
/// to all remaining term ids.
fn type_search_values(kind: AssetType) -> &'static [&'static str] {
    match kind {
        AssetType::Music => &["12"],
        AssetType::Model3d => &["10"],
        AssetType::Texture => &["14"],
        AssetType::Sound => &["13"],
        AssetType::Document => &["11"],
        AssetType::Other => &["9", "7273"], // 2D art, concept art
    }
}

fn license_search_value(license: &str) -> Option<&'static str> {
    Some(match license {
        "CC-BY 4.0" => "17981",
        "CC-BY 3.0" => "2",
        "CC-BY-SA 4.0" => "17982",
        "CC-BY-SA 3.0" => "3",
        "GPL 3.0" => "6",
        "GPL 2.0" => "5",
        "OGA-BY 3.0" => "10310",
        "CC0" => "4",
        "LGPL 3.0" => "8",
        "LGPL 2.1" => "7",
        _ => return None,
    })
}
