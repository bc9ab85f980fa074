use serde::{Deserialize, Serialize};

use crate::action_executor::app_store_url;
use crate::model::{SourceBadge, UpdateSource, VessloApp};
use crate::search::MatchedField;
use crate::tags::TagGroup;

/// Something the user can trigger from a list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppAction {
    OpenApp { path: String },
    ShowInFinder { path: String },
    OpenInVesslo { bundle_id: String },
    CopyBundleId { bundle_id: String },
    UpdateViaHomebrew { cask: String, app_name: String },
    OpenInAppStore { url: String },
    UpdateInVesslo { bundle_id: String },
    BrowseTag { tag: String },
    BackToTags,
    UpdateAllHomebrew,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelAction {
    pub title: String,
    pub action: AppAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub actions: Vec<PanelAction>,
}

/// Where an app row is being shown; decides which navigation actions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListContext {
    Search,
    TagDrillDown,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    Blue,
    Green,
    Orange,
    Purple,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Accessory {
    Text { text: String },
    Tag { value: String, tint: Tint },
    Icon { icon: String, tint: Tint, tooltip: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub accessories: Vec<Accessory>,
}

pub fn app_actions(app: &VessloApp, context: ListContext) -> Vec<ActionSection> {
    let mut sections = vec![section(None, open_actions(app))];

    let mut vesslo = Vec::new();
    if let Some(bundle_id) = app.bundle_id() {
        vesslo.push(entry(
            "Open in Vesslo",
            AppAction::OpenInVesslo {
                bundle_id: bundle_id.to_string(),
            },
        ));
        vesslo.push(entry(
            "Copy Bundle Id",
            AppAction::CopyBundleId {
                bundle_id: bundle_id.to_string(),
            },
        ));
    }
    push_non_empty(&mut sections, None, vesslo);

    if app.has_update() {
        let mut update = Vec::new();
        if let Some(action) = homebrew_update(app) {
            update.push(action);
        }
        if let Some(action) = app_store_update(app) {
            update.push(action);
        }
        if let Some(action) = sparkle_update(app) {
            update.push(action);
        }
        push_non_empty(&mut sections, Some("Update"), update);
    }

    match context {
        ListContext::Search => {
            let browse = app
                .tags
                .iter()
                .map(|tag| {
                    entry(
                        format!("Browse #{tag}"),
                        AppAction::BrowseTag { tag: tag.clone() },
                    )
                })
                .collect();
            push_non_empty(&mut sections, Some("Tags"), browse);
        }
        ListContext::TagDrillDown => {
            sections.push(section(None, vec![entry("Back to Tags", AppAction::BackToTags)]));
        }
        ListContext::Plain => {}
    }

    sections
}

/// Panel for a row in the updates list: the source-specific update action
/// comes first.
pub fn update_actions(app: &VessloApp) -> Vec<ActionSection> {
    let mut primary = Vec::new();
    if let Some(action) = homebrew_update(app) {
        primary.push(action);
    }
    if let Some(action) = app_store_update(app) {
        primary.push(action);
    }
    if let Some(action) = sparkle_update(app) {
        primary.push(action);
    }
    if !app.is_homebrew() && !app.is_app_store() && !app.is_sparkle() {
        if let Some(bundle_id) = app.bundle_id() {
            primary.push(entry(
                "Open in Vesslo",
                AppAction::OpenInVesslo {
                    bundle_id: bundle_id.to_string(),
                },
            ));
        }
    }

    let mut sections = Vec::new();
    push_non_empty(&mut sections, Some("Update"), primary);

    let mut secondary = open_actions(app);
    if let Some(bundle_id) = app.bundle_id() {
        secondary.push(entry(
            "Open in Vesslo",
            AppAction::OpenInVesslo {
                bundle_id: bundle_id.to_string(),
            },
        ));
    }
    sections.push(section(None, secondary));
    sections
}

pub fn bulk_actions(app: &VessloApp) -> Vec<ActionSection> {
    let mut actions = Vec::new();
    if let Some(cask) = app.homebrew_cask() {
        actions.push(entry(
            "Update",
            AppAction::UpdateViaHomebrew {
                cask: cask.to_string(),
                app_name: app.name.clone(),
            },
        ));
    }
    actions.push(entry("Update All", AppAction::UpdateAllHomebrew));
    vec![section(None, actions)]
}

pub fn bulk_header_actions() -> Vec<ActionSection> {
    vec![section(None, vec![entry("Update All", AppAction::UpdateAllHomebrew)])]
}

pub fn app_row(app: &VessloApp, matched_fields: &[MatchedField]) -> ListRow {
    let subtitle = std::iter::once(app.version.clone())
        .chain(std::iter::once(app.developer.clone()))
        .chain(app.tags.iter().map(|tag| Some(format!("#{tag}"))))
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" • ");

    let mut accessories: Vec<Accessory> = matched_fields
        .iter()
        .map(|field| Accessory::Icon {
            icon: matched_icon(*field).to_string(),
            tint: matched_tint(*field),
            tooltip: field.tooltip().to_string(),
        })
        .collect();

    if app.has_update() {
        accessories.push(Accessory::Tag {
            value: "UPDATE".to_string(),
            tint: Tint::Green,
        });
    }
    accessories.extend(app.update_sources().iter().map(|source| Accessory::Tag {
        value: source.to_string(),
        tint: source_tint(source),
    }));

    ListRow {
        id: app.id.clone(),
        title: app.name.clone(),
        subtitle,
        icon: app.icon_data_uri(),
        accessories,
    }
}

pub fn update_row(app: &VessloApp) -> ListRow {
    let badge = app.source_badge();
    let tint = match badge {
        SourceBadge::Brew => Tint::Orange,
        SourceBadge::AppStore => Tint::Blue,
        SourceBadge::Sparkle => Tint::Green,
        SourceBadge::Manual => Tint::Secondary,
    };
    ListRow {
        id: app.id.clone(),
        title: app.name.clone(),
        subtitle: app.developer.clone().unwrap_or_default(),
        icon: app.icon_data_uri(),
        accessories: vec![
            Accessory::Text {
                text: app.version_transition(),
            },
            Accessory::Tag {
                value: badge.label().to_string(),
                tint,
            },
        ],
    }
}

pub fn bulk_row(app: &VessloApp) -> ListRow {
    ListRow {
        id: app.id.clone(),
        title: app.name.clone(),
        subtitle: app.developer.clone().unwrap_or_default(),
        icon: app.icon_data_uri(),
        accessories: vec![
            Accessory::Text {
                text: app.version_transition(),
            },
            Accessory::Tag {
                value: "brew".to_string(),
                tint: Tint::Orange,
            },
        ],
    }
}

pub fn bulk_header_row(count: usize) -> ListRow {
    ListRow {
        id: "update-all-homebrew".to_string(),
        title: "Update All Homebrew Apps".to_string(),
        subtitle: format!("{count} apps"),
        icon: None,
        accessories: vec![Accessory::Tag {
            value: "BULK".to_string(),
            tint: Tint::Green,
        }],
    }
}

pub fn tag_row(group: &TagGroup<'_>) -> ListRow {
    ListRow {
        id: group.tag.to_string(),
        title: group.title(),
        subtitle: String::new(),
        icon: None,
        accessories: vec![Accessory::Text {
            text: format!("{} apps", group.count()),
        }],
    }
}

pub fn source_tint(source: &UpdateSource) -> Tint {
    match source {
        UpdateSource::Brew => Tint::Orange,
        UpdateSource::AppStore => Tint::Blue,
        UpdateSource::Sparkle => Tint::Green,
        UpdateSource::Other(_) => Tint::Secondary,
    }
}

fn matched_icon(field: MatchedField) -> &'static str {
    match field {
        MatchedField::Developer => "person",
        MatchedField::Memo => "document",
        MatchedField::Tag => "tag",
    }
}

fn matched_tint(field: MatchedField) -> Tint {
    match field {
        MatchedField::Developer => Tint::Blue,
        MatchedField::Memo => Tint::Orange,
        MatchedField::Tag => Tint::Purple,
    }
}

fn open_actions(app: &VessloApp) -> Vec<PanelAction> {
    vec![
        entry(
            "Open App",
            AppAction::OpenApp {
                path: app.path.clone(),
            },
        ),
        entry(
            "Show in Finder",
            AppAction::ShowInFinder {
                path: app.path.clone(),
            },
        ),
    ]
}

fn homebrew_update(app: &VessloApp) -> Option<PanelAction> {
    if !app.is_homebrew() {
        return None;
    }
    app.homebrew_cask().map(|cask| {
        entry(
            "Update via Homebrew",
            AppAction::UpdateViaHomebrew {
                cask: cask.to_string(),
                app_name: app.name.clone(),
            },
        )
    })
}

fn app_store_update(app: &VessloApp) -> Option<PanelAction> {
    if !app.is_app_store() {
        return None;
    }
    app.app_store_id().map(|id| {
        entry(
            "Open in App Store",
            AppAction::OpenInAppStore {
                url: app_store_url(id),
            },
        )
    })
}

fn sparkle_update(app: &VessloApp) -> Option<PanelAction> {
    if !app.is_sparkle() {
        return None;
    }
    app.bundle_id().map(|bundle_id| {
        entry(
            "Update in Vesslo",
            AppAction::UpdateInVesslo {
                bundle_id: bundle_id.to_string(),
            },
        )
    })
}

fn entry(title: impl Into<String>, action: AppAction) -> PanelAction {
    PanelAction {
        title: title.into(),
        action,
    }
}

fn section(title: Option<&str>, actions: Vec<PanelAction>) -> ActionSection {
    ActionSection {
        title: title.map(str::to_string),
        actions,
    }
}

fn push_non_empty(sections: &mut Vec<ActionSection>, title: Option<&str>, actions: Vec<PanelAction>) {
    if !actions.is_empty() {
        sections.push(section(title, actions));
    }
}
