use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::action_executor::Notice;
use crate::actions::{self, ActionSection, AppAction, ListContext, ListRow};
use crate::model::VessloApp;
use crate::search::{MatchedField, SearchResult};
use crate::tags::TagGroup;
use crate::updates::{SectionKind, SortOption, UpdateSection};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagAppsRequest {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatesRequest {
    #[serde(default)]
    pub sort: Option<SortOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRequest {
    pub action: AppAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Search(SearchRequest),
    Tags,
    TagApps(TagAppsRequest),
    Updates(UpdatesRequest),
    HomebrewUpdates,
    Run(RunRequest),
    UpgradeApp(AppRequest),
    UpgradeAll,
    Status,
}

/// One row plus everything the front-end needs to act on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListItemDto {
    pub app_id: String,
    pub row: ListRow,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_fields: Vec<MatchedField>,
    pub actions: Vec<ActionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagDto {
    pub tag: String,
    pub count: usize,
    pub row: ListRow,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagsResponse {
    pub title: String,
    pub tags: Vec<TagDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagAppsResponse {
    pub tag: String,
    pub title: String,
    pub apps: Vec<ListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionDto {
    pub kind: SectionKind,
    pub title: String,
    pub items: Vec<ListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatesResponse {
    pub sort: SortOption,
    pub sections: Vec<SectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomebrewUpdatesResponse {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_all: Option<ListItemDto>,
    pub items: Vec<ListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub data_path: PathBuf,
    pub available: bool,
    pub fresh: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    pub app_count: usize,
    pub update_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreResponse {
    Search(SearchResponse),
    Tags(TagsResponse),
    TagApps(TagAppsResponse),
    Updates(UpdatesResponse),
    HomebrewUpdates(HomebrewUpdatesResponse),
    Notice(Notice),
    Status(StatusResponse),
}

impl From<&SearchResult<'_>> for ListItemDto {
    fn from(value: &SearchResult<'_>) -> Self {
        Self {
            app_id: value.app.id.clone(),
            row: actions::app_row(value.app, &value.matched_fields),
            matched_fields: value.matched_fields.clone(),
            actions: actions::app_actions(value.app, ListContext::Search),
        }
    }
}

impl From<&TagGroup<'_>> for TagDto {
    fn from(value: &TagGroup<'_>) -> Self {
        Self {
            tag: value.tag.to_string(),
            count: value.count(),
            row: actions::tag_row(value),
        }
    }
}

impl From<&UpdateSection<'_>> for SectionDto {
    fn from(value: &UpdateSection<'_>) -> Self {
        Self {
            kind: value.kind,
            title: value.title.clone(),
            items: value.apps.iter().map(|app| update_item(app)).collect(),
        }
    }
}

pub fn tag_app_item(app: &VessloApp) -> ListItemDto {
    ListItemDto {
        app_id: app.id.clone(),
        row: actions::app_row(app, &[]),
        matched_fields: Vec::new(),
        actions: actions::app_actions(app, ListContext::TagDrillDown),
    }
}

pub fn update_item(app: &VessloApp) -> ListItemDto {
    ListItemDto {
        app_id: app.id.clone(),
        row: actions::update_row(app),
        matched_fields: Vec::new(),
        actions: actions::update_actions(app),
    }
}

pub fn bulk_item(app: &VessloApp) -> ListItemDto {
    ListItemDto {
        app_id: app.id.clone(),
        row: actions::bulk_row(app),
        matched_fields: Vec::new(),
        actions: actions::bulk_actions(app),
    }
}

pub fn bulk_header_item(count: usize) -> ListItemDto {
    let row = actions::bulk_header_row(count);
    ListItemDto {
        app_id: row.id.clone(),
        row,
        matched_fields: Vec::new(),
        actions: actions::bulk_header_actions(),
    }
}
