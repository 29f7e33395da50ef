use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "https://opengameart.org";

/// Session-wide configuration, immutable once a session is built from it.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Base URL of the target site.
    pub base_url: Url,
    /// Root for downloaded files (`<root>/content/...`) and the validator
    /// cache store (`<root>/cache/...`).
    pub root_dir: PathBuf,
    /// Admission ceiling: max concurrent in-flight requests.
    pub max_conns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url parses"),
            root_dir: default_root(),
            max_conns: 5,
        }
    }
}

/// On-disk shape; every field optional, falling back per field.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    url: Option<String>,
    root_dir: Option<PathBuf>,
    max_conns: Option<usize>,
}

impl SessionConfig {
    /// Load from a TOML file, defaulting field-wise.
    ///
    /// `path = None` reads `~/.gart/config.toml`; a missing file (at either
    /// location) yields the defaults rather than an error, so a fresh
    /// machine needs no setup.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_root().join("config.toml"),
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ClientError::Config(format!(
                    "cannot read {}: {err}",
                    path.display()
                )));
            }
        };
        let raw: RawConfig = toml::from_str(&text)
            .map_err(|err| ClientError::Config(format!("{}: {err}", path.display())))?;
        Self::default().merged(raw)
    }

    fn merged(mut self, raw: RawConfig) -> ClientResult<Self> {
        if let Some(url) = raw.url {
            self.base_url =
                Url::parse(&url).map_err(|err| ClientError::Config(format!("url: {err}")))?;
        }
        if let Some(root_dir) = raw.root_dir {
            self.root_dir = expand_home(root_dir);
        }
        if let Some(max_conns) = raw.max_conns {
            if max_conns == 0 {
                return Err(ClientError::Config("max_conns must be positive".into()));
            }
            self.max_conns = max_conns;
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = expand_home(root_dir.into());
        self
    }

    pub fn with_max_conns(mut self, max_conns: usize) -> Self {
        self.max_conns = max_conns.max(1);
        self
    }
}

fn default_root() -> PathBuf {
    home::home_dir()
        .map(|h| h.join(".gart"))
        .unwrap_or_else(|| PathBuf::from(".gart"))
}

fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path;
    };
    match home::home_dir() {
        Some(h) => h.join(stripped),
        None => path,
    }
}
