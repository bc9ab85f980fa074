use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::VessloApp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    Source,
    Name,
    NameDesc,
    Developer,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Source,
        SortOption::Name,
        SortOption::NameDesc,
        SortOption::Developer,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Name => "name",
            Self::NameDesc => "nameDesc",
            Self::Developer => "developer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "By Source",
            Self::Name => "By Name (A-Z)",
            Self::NameDesc => "By Name (Z-A)",
            Self::Developer => "By Developer",
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!("unknown sort option '{trimmed}'; expected source, name, nameDesc, or developer")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Homebrew,
    Sparkle,
    AppStore,
    Manual,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSection<'a> {
    pub kind: SectionKind,
    pub title: String,
    pub apps: Vec<&'a VessloApp>,
}

pub fn apps_with_updates(apps: &[VessloApp]) -> Vec<&VessloApp> {
    apps.iter().filter(|app| app.has_update()).collect()
}

pub fn sort_updates(apps: &mut [&VessloApp], option: SortOption) {
    match option {
        SortOption::Source => {}
        SortOption::Name => apps.sort_by(|a, b| locale_compare(&a.name, &b.name)),
        SortOption::NameDesc => apps.sort_by(|a, b| locale_compare(&b.name, &a.name)),
        SortOption::Developer => apps.sort_by(|a, b| {
            locale_compare(
                a.developer.as_deref().unwrap_or_default(),
                b.developer.as_deref().unwrap_or_default(),
            )
        }),
    }
}

/// Case-insensitive first, raw string as the tie-break so "arc" and "Arc"
/// still order deterministically.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn group_by_source<'a>(apps: &[&'a VessloApp]) -> Vec<UpdateSection<'a>> {
    let homebrew = collect(apps, |app| app.is_homebrew());
    let sparkle = collect(apps, |app| app.is_sparkle() && !app.is_homebrew());
    let app_store = collect(apps, |app| app.is_app_store());
    let manual = collect(apps, |app| {
        !app.is_homebrew() && !app.is_sparkle() && !app.is_app_store()
    });

    [
        (SectionKind::Homebrew, "Homebrew", homebrew),
        (SectionKind::Sparkle, "Sparkle", sparkle),
        (SectionKind::AppStore, "App Store", app_store),
        (SectionKind::Manual, "Manual", manual),
    ]
    .into_iter()
    .filter(|(_, _, apps)| !apps.is_empty())
    .map(|(kind, label, apps)| UpdateSection {
        kind,
        title: format!("{label} ({})", apps.len()),
        apps,
    })
    .collect()
}

/// Builds the sections of the updates view for the chosen sort.
pub fn sections(apps: &[VessloApp], option: SortOption) -> Vec<UpdateSection<'_>> {
    let mut pending = apps_with_updates(apps);
    if pending.is_empty() {
        return Vec::new();
    }

    sort_updates(&mut pending, option);
    match option {
        SortOption::Source => group_by_source(&pending),
        _ => vec![UpdateSection {
            kind: SectionKind::All,
            title: format!("Updates ({}) - {}", pending.len(), option.label()),
            apps: pending,
        }],
    }
}

pub fn homebrew_updates(apps: &[VessloApp]) -> Vec<&VessloApp> {
    apps.iter()
        .filter(|app| app.is_homebrew() && app.has_update() && app.homebrew_cask().is_some())
        .collect()
}

fn collect<'a>(apps: &[&'a VessloApp], keep: impl Fn(&VessloApp) -> bool) -> Vec<&'a VessloApp> {
    apps.iter().copied().filter(|app| keep(app)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_option_parses_keys_case_insensitively() {
        assert_eq!("nameDesc".parse::<SortOption>(), Ok(SortOption::NameDesc));
        assert_eq!(" NAMEDESC ".parse::<SortOption>(), Ok(SortOption::NameDesc));
        assert_eq!("developer".parse::<SortOption>(), Ok(SortOption::Developer));
        assert!("size".parse::<SortOption>().is_err());
    }

    #[test]
    fn default_sort_is_by_source() {
        assert_eq!(SortOption::default(), SortOption::Source);
        assert_eq!(SortOption::default().label(), "By Source");
    }

    #[test]
    fn locale_compare_ignores_case_before_raw_order() {
        assert_eq!(locale_compare("arc", "Brave"), Ordering::Less);
        assert_eq!(locale_compare("Arc", "arc"), Ordering::Less);
        assert_eq!(locale_compare("zed", "Zed"), Ordering::Greater);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }
}
