use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub const SOURCE_BREW: &str = "Brew";
pub const SOURCE_SPARKLE: &str = "Sparkle";
pub const SOURCE_APP_STORE: &str = "App Store";

/// One application as exported by Vesslo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VessloApp {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub target_version: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    pub path: String,
    /// Base64 encoded PNG.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub app_store_id: Option<String>,
    #[serde(default)]
    pub homebrew_cask: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VessloData {
    pub exported_at: String,
    #[serde(default)]
    pub update_count: u32,
    #[serde(default)]
    pub apps: Vec<VessloApp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateSource {
    Brew,
    Sparkle,
    AppStore,
    Other(String),
}

impl UpdateSource {
    pub fn parse(raw: &str) -> Self {
        match raw {
            SOURCE_BREW => Self::Brew,
            SOURCE_SPARKLE => Self::Sparkle,
            SOURCE_APP_STORE => Self::AppStore,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Brew => SOURCE_BREW,
            Self::Sparkle => SOURCE_SPARKLE,
            Self::AppStore => SOURCE_APP_STORE,
            Self::Other(raw) => raw,
        }
    }
}

impl Display for UpdateSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge shown next to an entry in the updates list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceBadge {
    Brew,
    AppStore,
    Sparkle,
    Manual,
}

impl SourceBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::AppStore => "appStore",
            Self::Sparkle => "sparkle",
            Self::Manual => "manual",
        }
    }
}

impl VessloApp {
    pub fn has_update(&self) -> bool {
        self.target_version.is_some()
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources.iter().any(|candidate| candidate == source)
    }

    pub fn is_homebrew(&self) -> bool {
        self.has_source(SOURCE_BREW)
    }

    pub fn is_sparkle(&self) -> bool {
        self.has_source(SOURCE_SPARKLE)
    }

    pub fn is_app_store(&self) -> bool {
        self.has_source(SOURCE_APP_STORE)
    }

    pub fn update_sources(&self) -> Vec<UpdateSource> {
        self.sources.iter().map(|raw| UpdateSource::parse(raw)).collect()
    }

    pub fn source_badge(&self) -> SourceBadge {
        if self.is_homebrew() {
            SourceBadge::Brew
        } else if self.is_app_store() {
            SourceBadge::AppStore
        } else if self.is_sparkle() {
            SourceBadge::Sparkle
        } else {
            SourceBadge::Manual
        }
    }

    pub fn version_transition(&self) -> String {
        format!(
            "{} → {}",
            self.version.as_deref().unwrap_or_default(),
            self.target_version.as_deref().unwrap_or_default()
        )
    }

    pub fn icon_data_uri(&self) -> Option<String> {
        self.icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| format!("data:image/png;base64,{icon}"))
    }

    /// Bundle id with blank values treated as absent.
    pub fn bundle_id(&self) -> Option<&str> {
        non_blank(self.bundle_id.as_deref())
    }

    pub fn homebrew_cask(&self) -> Option<&str> {
        non_blank(self.homebrew_cask.as_deref())
    }

    pub fn app_store_id(&self) -> Option<&str> {
        non_blank(self.app_store_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn fold_case(input: &str) -> String {
    input.to_lowercase()
}
