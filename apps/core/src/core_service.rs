use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::action_executor::{
    brew_upgrade_command_line, CommandRunner, LaunchError, Launcher, Notice,
};
use crate::actions::AppAction;
use crate::config::{validate, Config};
use crate::contract::{
    self, CoreRequest, CoreResponse, HomebrewUpdatesResponse, ListItemDto, SearchResponse,
    StatusResponse, TagAppsResponse, TagDto, TagsResponse, UpdatesResponse,
};
use crate::model::{VessloApp, VessloData};
use crate::search::{self, SearchResult};
use crate::snapshot;
use crate::tags::{self, TagGroup};
use crate::updates::{self, SortOption, UpdateSection};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("vesslo data not found at {}; run Vesslo first", .0.display())]
    DataUnavailable(PathBuf),
    #[error("app not found: {0}")]
    AppNotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),
}

/// Result of running an action: either a status notice, or a request to move
/// the front-end to another list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Notice(Notice),
    ShowSearch { query: String },
    ShowTags,
}

pub struct VessloService {
    config: Config,
    data: Option<VessloData>,
    launcher: Launcher,
}

impl VessloService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let data = snapshot::load_optional(&config.data_path);
        let launcher = Launcher::system(config.programs());
        Ok(Self {
            config,
            data,
            launcher,
        })
    }

    pub fn with_data(
        config: Config,
        data: Option<VessloData>,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let launcher = Launcher::new(config.programs(), runner);
        Ok(Self {
            config,
            data,
            launcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-reads the snapshot from disk; returns whether data is available.
    pub fn reload(&mut self) -> bool {
        self.data = snapshot::load_optional(&self.config.data_path);
        self.data.is_some()
    }

    pub fn data(&self) -> Result<&VessloData, ServiceError> {
        self.data
            .as_ref()
            .ok_or_else(|| ServiceError::DataUnavailable(self.config.data_path.clone()))
    }

    pub fn search(&self, query: &str) -> Result<Vec<SearchResult<'_>>, ServiceError> {
        Ok(search::search(&self.data()?.apps, query))
    }

    pub fn tags(&self) -> Result<Vec<TagGroup<'_>>, ServiceError> {
        Ok(tags::tag_groups(&self.data()?.apps))
    }

    pub fn tag_apps(&self, tag: &str) -> Result<Vec<&VessloApp>, ServiceError> {
        let groups = self.tags()?;
        Ok(tags::apps_for_tag(&groups, tag))
    }

    pub fn updates(&self, sort: SortOption) -> Result<Vec<UpdateSection<'_>>, ServiceError> {
        Ok(updates::sections(&self.data()?.apps, sort))
    }

    pub fn homebrew_updates(&self) -> Result<Vec<&VessloApp>, ServiceError> {
        Ok(updates::homebrew_updates(&self.data()?.apps))
    }

    pub fn find_app(&self, id: &str) -> Result<&VessloApp, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::InvalidRequest("app id is required".into()));
        }
        self.data()?
            .apps
            .iter()
            .find(|app| app.id == id)
            .ok_or_else(|| ServiceError::AppNotFound(id.to_string()))
    }

    /// Progress notice to show while `action` runs, if it is a long one.
    pub fn pending_notice(&self, action: &AppAction) -> Option<Notice> {
        match action {
            AppAction::UpdateViaHomebrew { cask, app_name } => Some(Notice::animated(
                format!("Updating {app_name}..."),
                Some(brew_upgrade_command_line(cask)),
            )),
            AppAction::UpdateAllHomebrew => {
                let count = self.homebrew_updates().map(|apps| apps.len()).unwrap_or(0);
                (count > 0).then(|| {
                    Notice::animated("Updating all Homebrew apps...", Some(format!("{count} apps")))
                })
            }
            _ => None,
        }
    }

    pub fn run(&self, action: &AppAction) -> Result<ActionOutcome, ServiceError> {
        tracing::info!(?action, "running action");
        let outcome = match action {
            AppAction::OpenApp { path } => {
                self.launcher.open_path(path)?;
                Notice::success("Opened app", Some(path.clone()))
            }
            AppAction::ShowInFinder { path } => {
                self.launcher.reveal_path(path)?;
                Notice::success("Revealed in Finder", Some(path.clone()))
            }
            AppAction::OpenInVesslo { bundle_id } | AppAction::UpdateInVesslo { bundle_id } => {
                self.open_in_vesslo(bundle_id)?
            }
            AppAction::CopyBundleId { bundle_id } => {
                self.launcher.copy_to_clipboard(bundle_id)?;
                Notice::success("Copied to clipboard", Some(bundle_id.clone()))
            }
            AppAction::UpdateViaHomebrew { cask, app_name } => {
                if cask.trim().is_empty() {
                    return Err(ServiceError::InvalidRequest("cask is required".into()));
                }
                self.launcher.run_brew_upgrade(cask, app_name)
            }
            AppAction::OpenInAppStore { url } => {
                self.launcher.open_target(url)?;
                Notice::success("Opened App Store", Some(url.clone()))
            }
            AppAction::UpdateAllHomebrew => return self.upgrade_all().map(ActionOutcome::Notice),
            AppAction::BrowseTag { tag } => {
                return Ok(ActionOutcome::ShowSearch { query: tag.clone() })
            }
            AppAction::BackToTags => return Ok(ActionOutcome::ShowTags),
        };
        Ok(ActionOutcome::Notice(outcome))
    }

    pub fn upgrade_app(&self, id: &str) -> Result<Notice, ServiceError> {
        let app = self.find_app(id)?;
        if !app.has_update() {
            return Err(ServiceError::InvalidRequest(format!(
                "{} has no pending update",
                app.name
            )));
        }
        let cask = match (app.is_homebrew(), app.homebrew_cask()) {
            (true, Some(cask)) => cask,
            _ => {
                return Err(ServiceError::InvalidRequest(format!(
                    "{} is not updatable via Homebrew",
                    app.name
                )))
            }
        };
        Ok(self.launcher.run_brew_upgrade(cask, &app.name))
    }

    pub fn upgrade_all(&self) -> Result<Notice, ServiceError> {
        let candidates = self.homebrew_updates()?;
        if candidates.is_empty() {
            return Ok(Notice::success(
                "All Homebrew apps are up to date!",
                Some("No Homebrew updates available".to_string()),
            ));
        }
        Ok(self.launcher.run_brew_upgrade_all(candidates.len()))
    }

    pub fn status(&self, now: DateTime<Utc>) -> StatusResponse {
        match &self.data {
            Some(data) => StatusResponse {
                data_path: self.config.data_path.clone(),
                available: true,
                fresh: snapshot::is_fresh(data, now, self.config.max_age()),
                exported_at: Some(data.exported_at.clone()),
                app_count: data.apps.len(),
                update_count: updates::apps_with_updates(&data.apps).len(),
            },
            None => StatusResponse {
                data_path: self.config.data_path.clone(),
                available: false,
                fresh: false,
                exported_at: None,
                app_count: 0,
                update_count: 0,
            },
        }
    }

    pub fn handle_command(&self, request: CoreRequest) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::Search(payload) => self.search_response(payload.query),
            CoreRequest::Tags => self.tags_response(),
            CoreRequest::TagApps(payload) => {
                // Tags match exactly, so only a blank tag is rejected.
                let tag = payload.tag.as_str();
                if tag.trim().is_empty() {
                    return Err(ServiceError::InvalidRequest("tag is required".into()));
                }
                let apps = self.tag_apps(tag)?;
                Ok(CoreResponse::TagApps(TagAppsResponse {
                    tag: tag.to_string(),
                    title: format!("#{tag} ({} apps)", apps.len()),
                    apps: apps.into_iter().map(contract::tag_app_item).collect(),
                }))
            }
            CoreRequest::Updates(payload) => {
                let sort = payload.sort.unwrap_or_default();
                let sections = self.updates(sort)?;
                Ok(CoreResponse::Updates(UpdatesResponse {
                    sort,
                    sections: sections.iter().map(Into::into).collect(),
                }))
            }
            CoreRequest::HomebrewUpdates => {
                let apps = self.homebrew_updates()?;
                Ok(CoreResponse::HomebrewUpdates(HomebrewUpdatesResponse {
                    title: format!("Homebrew Updates ({})", apps.len()),
                    update_all: (!apps.is_empty()).then(|| contract::bulk_header_item(apps.len())),
                    items: apps.into_iter().map(contract::bulk_item).collect(),
                }))
            }
            CoreRequest::Run(payload) => match self.run(&payload.action)? {
                ActionOutcome::Notice(notice) => Ok(CoreResponse::Notice(notice)),
                ActionOutcome::ShowSearch { query } => self.search_response(query),
                ActionOutcome::ShowTags => self.tags_response(),
            },
            CoreRequest::UpgradeApp(payload) => self.upgrade_app(&payload.id).map(CoreResponse::Notice),
            CoreRequest::UpgradeAll => self.upgrade_all().map(CoreResponse::Notice),
            CoreRequest::Status => Ok(CoreResponse::Status(self.status(Utc::now()))),
        }
    }

    fn search_response(&self, query: String) -> Result<CoreResponse, ServiceError> {
        let results: Vec<ListItemDto> = self.search(&query)?.iter().map(Into::into).collect();
        Ok(CoreResponse::Search(SearchResponse { query, results }))
    }

    fn tags_response(&self) -> Result<CoreResponse, ServiceError> {
        let groups = self.tags()?;
        Ok(CoreResponse::Tags(TagsResponse {
            title: tags::tags_section_title(&groups),
            tags: groups.iter().map(TagDto::from).collect(),
        }))
    }

    fn open_in_vesslo(&self, bundle_id: &str) -> Result<Notice, ServiceError> {
        if bundle_id.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("bundle id is required".into()));
        }
        Ok(match self.launcher.open_in_vesslo(bundle_id) {
            Ok(()) => Notice::success("Opened in Vesslo", Some(bundle_id.to_string())),
            Err(error) => {
                tracing::warn!(bundle_id, "failed to open in vesslo: {error}");
                Notice::failure("Failed to open in Vesslo", error.to_string())
            }
        })
    }
}
