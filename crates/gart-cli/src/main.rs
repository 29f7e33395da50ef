#![forbid(unsafe_code)]

//! `gart` — search, describe, and download OpenGameArt.org assets.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use gart::{Asset, AssetType, SearchQuery, Session, SessionConfig, SortBy, TagMode};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "gart", version, about = "Search and download assets from OpenGameArt.org")]
struct App {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

/// Options shared by every subcommand; each one overrides the config file.
#[derive(Debug, Args)]
struct GlobalArgs {
    /// Config file to read (default: ~/.gart/config.toml).
    #[arg(long, global = true)]
    config_path: Option<PathBuf>,

    /// Root for downloaded files and the validator cache.
    #[arg(long, global = true)]
    root_dir: Option<PathBuf>,

    /// Base URL of the target site.
    #[arg(long, global = true)]
    url: Option<Url>,

    /// Max concurrent in-flight requests.
    #[arg(long, global = true)]
    max_conns: Option<usize>,
}

impl GlobalArgs {
    fn into_config(self) -> anyhow::Result<SessionConfig> {
        let mut config = SessionConfig::load(self.config_path.as_deref())?;
        if let Some(root_dir) = self.root_dir {
            config = config.with_root_dir(root_dir);
        }
        if let Some(url) = self.url {
            config = config.with_base_url(url);
        }
        if let Some(max_conns) = self.max_conns {
            config = config.with_max_conns(max_conns);
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up a single asset.
    Describe {
        asset: String,
        /// Full JSON instead of the one-line summary.
        #[arg(long)]
        verbose: bool,
    },
    /// Download the files of a single asset, skipping unchanged ones.
    Download { asset: String },
    /// Search for assets and describe each hit.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Search the whole page.
    #[arg(long)]
    keys: Option<String>,

    /// Search the asset title.
    #[arg(long)]
    title: Option<String>,

    /// Search the submitter name.
    #[arg(long)]
    submitter: Option<String>,

    #[arg(long = "type", value_enum)]
    types: Vec<TypeArg>,

    /// Freeform tag; repeatable.
    #[arg(long = "tag")]
    tags: Vec<String>,

    #[arg(long, value_enum, default_value = "or")]
    tag_mode: TagModeArg,

    #[arg(long, value_enum)]
    license: Option<LicenseArg>,

    #[arg(long, value_enum, default_value = "favorites")]
    sort_by: SortByArg,

    /// Sort descending (the default).
    #[arg(long, overrides_with = "ascending")]
    descending: bool,

    /// Sort ascending instead.
    #[arg(long)]
    ascending: bool,

    /// Stop after this many result pages.
    #[arg(long)]
    page_limit: Option<u32>,

    /// Full JSON per hit instead of one-line summaries.
    #[arg(long)]
    verbose: bool,
}

impl SearchArgs {
    fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new()
            .with_tag_mode(self.tag_mode.into())
            .with_sort(self.sort_by.into(), !self.ascending);
        if let Some(keys) = &self.keys {
            query = query.with_keys(keys);
        }
        if let Some(title) = &self.title {
            query = query.with_title(title);
        }
        if let Some(submitter) = &self.submitter {
            query = query.with_submitter(submitter);
        }
        for kind in &self.types {
            query = query.with_type((*kind).into());
        }
        for tag in &self.tags {
            query = query.with_tag(tag);
        }
        if let Some(license) = self.license {
            query = query.with_license(license.site_name());
        }
        if let Some(pages) = self.page_limit {
            query = query.with_page_limit(pages);
        }
        query
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    #[value(name = "2d")]
    Art2d,
    #[value(name = "3d")]
    Art3d,
    Concept,
    Texture,
    Music,
    Sfx,
    Doc,
}

impl From<TypeArg> for AssetType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Art2d | TypeArg::Concept => AssetType::Other,
            TypeArg::Art3d => AssetType::Model3d,
            TypeArg::Texture => AssetType::Texture,
            TypeArg::Music => AssetType::Music,
            TypeArg::Sfx => AssetType::Sound,
            TypeArg::Doc => AssetType::Document,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TagModeArg {
    Or,
    And,
}

impl From<TagModeArg> for TagMode {
    fn from(arg: TagModeArg) -> Self {
        match arg {
            TagModeArg::Or => TagMode::Or,
            TagModeArg::And => TagMode::And,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortByArg {
    Favorites,
    Created,
    Views,
}

impl From<SortByArg> for SortBy {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Favorites => SortBy::Favorites,
            SortByArg::Created => SortBy::Created,
            SortByArg::Views => SortBy::Views,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LicenseArg {
    #[value(name = "cc-by-40")]
    CcBy40,
    #[value(name = "cc-by-30")]
    CcBy30,
    #[value(name = "cc-by-sa-40")]
    CcBySa40,
    #[value(name = "cc-by-sa-30")]
    CcBySa30,
    #[value(name = "gpl-30")]
    Gpl30,
    #[value(name = "gpl-20")]
    Gpl20,
    #[value(name = "oga-by-30")]
    OgaBy30,
    Cc0,
    #[value(name = "lgpl-30")]
    Lgpl30,
    #[value(name = "lgpl-21")]
    Lgpl21,
}

impl LicenseArg {
    /// The license name as the site spells it.
    fn site_name(self) -> &'static str {
        match self {
            Self::CcBy40 => "CC-BY 4.0",
            Self::CcBy30 => "CC-BY 3.0",
            Self::CcBySa40 => "CC-BY-SA 4.0",
            Self::CcBySa30 => "CC-BY-SA 3.0",
            Self::Gpl30 => "GPL 3.0",
            Self::Gpl20 => "GPL 2.0",
            Self::OgaBy30 => "OGA-BY 3.0",
            Self::Cc0 => "CC0",
            Self::Lgpl30 => "LGPL 3.0",
            Self::Lgpl21 => "LGPL 2.1",
        }
    }
}

fn render_asset(asset: &Asset, verbose: bool) -> anyhow::Result<String> {
    if verbose {
        Ok(serde_json::to_string_pretty(asset)?)
    } else {
        Ok(asset.summary_line())
    }
}

async fn run(app: App) -> anyhow::Result<()> {
    let session = Session::new(app.global.into_config()?);

    match app.cmd {
        Command::Describe { asset, verbose } => {
            let asset = session.describe(&asset).await?;
            println!("{}", render_asset(&asset, verbose)?);
        }
        Command::Download { asset } => {
            let mut report = session.download_by_id(&asset).await?;
            report.sort_by_filename();
            for outcome in &report.outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
        }
        Command::Search(args) => {
            let verbose = args.verbose;
            let mut hits = std::pin::pin!(session.search(args.to_query()));
            while let Some(hit) = hits.next().await {
                let hit = hit.context("search failed")?;
                // Summaries only carry id/title/tags; describe each hit for
                // the full record, as the detail view does.
                let asset = session.describe(&hit.id).await?;
                println!("{}", render_asset(&asset, verbose)?);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    run(App::parse()).await
}
