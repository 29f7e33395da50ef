use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::{
    model::AssetSummary,
    page::{DetailPage, PageParser, ParseError, SearchPage},
};

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#).expect("anchor regex")
});
static LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="[^"]*license-name[^"]*"[^>]*>([^<]+)<"#).expect("license regex")
});
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*([0-9]+)\s*<").expect("number regex"));
static TAG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag strip regex"));

const FILES_PREFIX: &str = "/sites/default/files/";

/// Parser for the site's Drupal markup.
///
/// Field blocks are located by their `field-name-*` class markers and
/// scanned with regular expressions; there is deliberately no DOM here.
/// Anything that stops matching surfaces as [`ParseError`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SitePages;

/// Slice `body` from a class marker to the start of the next field block.
fn section<'a>(body: &'a str, class: &str) -> Option<&'a str> {
    let start = body.find(class)?;
    let rest = &body[start + class.len()..];
    let end = rest.find("field-name-").map_or(rest.len(), |i| i);
    Some(&rest[..end])
}

fn anchors(window: &str) -> impl Iterator<Item = (&str, &str)> {
    ANCHOR_RE
        .captures_iter(window)
        .filter_map(|cap| match (cap.get(1), cap.get(2)) {
            (Some(href), Some(text)) => Some((href.as_str(), text.as_str())),
            _ => None,
        })
}

fn inner_text(window: &str) -> String {
    let stripped = TAG_STRIP_RE.replace_all(window, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PageParser for SitePages {
    fn parse_asset_detail(&self, body: &str) -> Result<DetailPage, ParseError> {
        let type_section = section(body, "field-name-field-art-type")
            .ok_or(ParseError::MissingSection("field-name-field-art-type"))?;
        let type_label = anchors(type_section)
            .next()
            .map(|(_, text)| text.trim().to_string())
            .ok_or_else(|| ParseError::invalid("type", "no link inside type section"))?;

        let author = section(body, "field-name-author-submitter").and_then(|window| {
            anchors(window)
                .find_map(|(href, _)| href.strip_prefix("/users/"))
                .map(|rest| rest.trim_end_matches('/').to_string())
        });

        let licenses = section(body, "field-name-field-art-licenses")
            .map(|window| {
                LICENSE_RE
                    .captures_iter(window)
                    .filter_map(|cap| cap.get(1))
                    .map(|m| m.as_str().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let tags = section(body, "field-name-field-art-tags")
            .map(|window| {
                anchors(window)
                    .map(|(_, text)| text.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let favorites_section = section(body, "field-name-favorites")
            .ok_or(ParseError::MissingSection("field-name-favorites"))?;
        let favorites = NUMBER_RE
            .captures(favorites_section)
            .and_then(|cap| cap.get(1))
            .ok_or_else(|| ParseError::invalid("favorites", "no count in favorites section"))?
            .as_str()
            .parse::<u32>()
            .map_err(|e| ParseError::invalid("favorites", e.to_string()))?;

        let attribution = section(body, "field-name-field-art-attribution")
            .map(|window| inner_text(window))
            .filter(|text| !text.is_empty());

        let files_section = section(body, "field-name-field-art-files")
            .ok_or(ParseError::MissingSection("field-name-field-art-files"))?;
        let mut file_ids = Vec::new();
        for (href, _) in anchors(files_section) {
            if let Some(idx) = href.find(FILES_PREFIX) {
                let raw = &href[idx + FILES_PREFIX.len()..];
                let decoded = percent_decode_str(raw)
                    .decode_utf8()
                    .map_err(|e| ParseError::invalid("file id", e.to_string()))?;
                file_ids.push(decoded.into_owned());
            }
        }

        Ok(DetailPage {
            author,
            type_label,
            licenses,
            tags,
            favorites,
            attribution,
            file_ids,
        })
    }

    fn parse_search_page(&self, body: &str) -> Result<SearchPage, ParseError> {
        // No results container means an empty final page, not drift.
        let Some(start) = body.find("view-display-id-search_art_advanced") else {
            return Ok(SearchPage::default());
        };
        let container = &body[start..];

        let mut entries = Vec::new();
        let mut tiles = container.split("art-preview-title");
        tiles.next(); // text before the first tile
        for tile in tiles {
            let Some((href, title)) = anchors(tile).next() else {
                return Err(ParseError::invalid("search tile", "title without link"));
            };
            let Some(id) = href.strip_prefix("/content/") else {
                return Err(ParseError::invalid("search tile", format!("bad href {href}")));
            };
            let tags = section(tile, "field-name-field-art-tags")
                .map(|window| {
                    anchors(window)
                        .map(|(_, text)| text.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            entries.push(AssetSummary {
                id: id.trim_end_matches('/').to_string(),
                title: title.trim().to_string(),
                tags,
            });
        }

        let has_next = body.contains("pager-next") || body.contains("pager-last");
        Ok(SearchPage { entries, has_next })
    }
}
