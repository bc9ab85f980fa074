use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::action_executor::{Notice, NoticeStyle};
use crate::actions::{Accessory, AppAction, ListRow};
use crate::config::{self, ConfigError};
use crate::contract::{
    AppRequest, CoreRequest, CoreResponse, ListItemDto, RunRequest, SearchRequest,
    TagAppsRequest, UpdatesRequest,
};
use crate::core_service::{ServiceError, VessloService};
use crate::transport::{self, TransportResponse};
use crate::updates::SortOption;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("action failed: {0}")]
    ActionFailed(String),
}

#[derive(Debug, Parser)]
#[command(
    name = "vesslo-core",
    version,
    about = "Browse, search, and update apps tracked by Vesslo"
)]
pub struct CliOptions {
    /// Config file (TOML, or JSON5 for .json/.json5).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Snapshot to read instead of ~/.vesslo/data.json.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
    /// Print transport JSON instead of list rows.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Search apps by name, developer, tag, or memo.
    Search { query: Option<String> },
    /// List tags with app counts.
    Tags,
    /// List the apps carrying a tag.
    Tag { name: String },
    /// List pending updates.
    Updates {
        #[arg(long, default_value_t = SortOption::Source)]
        sort: SortOption,
    },
    /// List Homebrew apps with pending updates.
    BrewUpdates,
    /// Upgrade one app through Homebrew.
    Upgrade { id: String },
    /// Upgrade every outdated Homebrew cask.
    UpgradeAll {
        #[arg(long)]
        yes: bool,
    },
    /// Open the application bundle.
    Open { id: String },
    /// Reveal the application in Finder.
    Reveal { id: String },
    /// Open the app's page in Vesslo.
    Vesslo { id: String },
    /// Open the app's Mac App Store page.
    AppStore { id: String },
    /// Copy the bundle id to the clipboard.
    CopyId { id: String },
    /// Report whether the snapshot exists and is recent.
    Status,
    /// Answer line-delimited JSON requests on stdin.
    Serve,
    /// Print the log directory.
    Logs,
}

pub fn parse_cli_args<I, T>(args: I) -> Result<CliOptions, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CliOptions::try_parse_from(args)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let mut cfg = config::load(options.config.as_deref())?;
    if let Some(data) = &options.data {
        cfg.data_path = data.clone();
    }
    tracing::info!(
        command = ?options.command,
        config_path = %cfg.config_path.display(),
        data_path = %cfg.data_path.display(),
        "startup"
    );

    let service = VessloService::new(cfg)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    execute(
        &options,
        &service,
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}

/// Runs one CLI command against `service`. Rows and JSON go to `out`;
/// prompts and progress go to `err`.
pub fn execute(
    options: &CliOptions,
    service: &VessloService,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RuntimeError> {
    match &options.command {
        CliCommand::Serve => {
            transport::serve(service, input, out)?;
            return Ok(());
        }
        CliCommand::Logs => {
            writeln!(out, "{}", crate::logging::logs_dir().display())?;
            return Ok(());
        }
        CliCommand::UpgradeAll { yes: false } => {
            if !confirm_upgrade_all(service, input, err)? {
                writeln!(err, "Cancelled")?;
                return Ok(());
            }
        }
        _ => {}
    }

    let request = match request_for(&options.command, service) {
        Ok(request) => request,
        Err(error) if options.json => {
            let response = TransportResponse::Err {
                error: transport::map_service_error(error),
            };
            writeln!(out, "{}", transport::encode(&response))?;
            return Err(RuntimeError::ActionFailed("request failed".into()));
        }
        Err(error) => return Err(error.into()),
    };
    if let Some(notice) = pending_notice(service, &request) {
        writeln!(err, "{}", format_notice(&notice))?;
    }

    if options.json {
        let response = transport::handle_request(service, request);
        let failed = match &response {
            TransportResponse::Err { .. } => true,
            TransportResponse::Ok {
                response: CoreResponse::Notice(notice),
            } => notice.is_failure(),
            TransportResponse::Ok { .. } => false,
        };
        writeln!(out, "{}", transport::encode(&response))?;
        if failed {
            return Err(RuntimeError::ActionFailed("request failed".into()));
        }
        return Ok(());
    }

    let response = service.handle_command(request)?;
    render(&response, out)?;
    match response {
        CoreResponse::Notice(notice) if notice.is_failure() => Err(RuntimeError::ActionFailed(
            notice.message.unwrap_or(notice.title),
        )),
        _ => Ok(()),
    }
}

pub fn request_for(
    command: &CliCommand,
    service: &VessloService,
) -> Result<CoreRequest, ServiceError> {
    let request = match command {
        CliCommand::Search { query } => CoreRequest::Search(SearchRequest {
            query: query.clone().unwrap_or_default(),
        }),
        CliCommand::Tags => CoreRequest::Tags,
        CliCommand::Tag { name } => CoreRequest::TagApps(TagAppsRequest { tag: name.clone() }),
        CliCommand::Updates { sort } => CoreRequest::Updates(UpdatesRequest { sort: Some(*sort) }),
        CliCommand::BrewUpdates => CoreRequest::HomebrewUpdates,
        CliCommand::Upgrade { id } => CoreRequest::UpgradeApp(AppRequest { id: id.clone() }),
        CliCommand::UpgradeAll { .. } => CoreRequest::UpgradeAll,
        CliCommand::Open { id } => run(AppAction::OpenApp {
            path: service.find_app(id)?.path.clone(),
        }),
        CliCommand::Reveal { id } => run(AppAction::ShowInFinder {
            path: service.find_app(id)?.path.clone(),
        }),
        CliCommand::Vesslo { id } => run(AppAction::OpenInVesslo {
            bundle_id: required(service.find_app(id)?.bundle_id(), "bundle id", id)?,
        }),
        CliCommand::AppStore { id } => run(AppAction::OpenInAppStore {
            url: crate::action_executor::app_store_url(&required(
                service.find_app(id)?.app_store_id(),
                "app store id",
                id,
            )?),
        }),
        CliCommand::CopyId { id } => run(AppAction::CopyBundleId {
            bundle_id: required(service.find_app(id)?.bundle_id(), "bundle id", id)?,
        }),
        CliCommand::Status => CoreRequest::Status,
        CliCommand::Serve | CliCommand::Logs => {
            return Err(ServiceError::InvalidRequest(
                "command has no request form".into(),
            ))
        }
    };
    Ok(request)
}

fn run(action: AppAction) -> CoreRequest {
    CoreRequest::Run(RunRequest { action })
}

fn required(value: Option<&str>, what: &str, id: &str) -> Result<String, ServiceError> {
    value
        .map(str::to_string)
        .ok_or_else(|| ServiceError::InvalidRequest(format!("app '{id}' has no {what}")))
}

fn pending_notice(service: &VessloService, request: &CoreRequest) -> Option<Notice> {
    match request {
        CoreRequest::Run(payload) => service.pending_notice(&payload.action),
        CoreRequest::UpgradeAll => service.pending_notice(&AppAction::UpdateAllHomebrew),
        CoreRequest::UpgradeApp(payload) => {
            let app = service.find_app(&payload.id).ok()?;
            service.pending_notice(&AppAction::UpdateViaHomebrew {
                cask: app.homebrew_cask()?.to_string(),
                app_name: app.name.clone(),
            })
        }
        _ => None,
    }
}

fn confirm_upgrade_all(
    service: &VessloService,
    input: &mut dyn BufRead,
    err: &mut dyn Write,
) -> Result<bool, RuntimeError> {
    let count = service.homebrew_updates()?.len();
    if count == 0 {
        return Ok(true);
    }
    write!(
        err,
        "Update All Homebrew Apps: This will update {count} apps using Homebrew. Continue? [y/N] "
    )?;
    err.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn render(response: &CoreResponse, out: &mut dyn Write) -> std::io::Result<()> {
    match response {
        CoreResponse::Search(payload) => {
            if payload.results.is_empty() {
                writeln!(out, "No apps found. Try a different search term.")?;
            }
            render_items(&payload.results, out)
        }
        CoreResponse::Tags(payload) => {
            if payload.tags.is_empty() {
                return writeln!(out, "No tags found. Add tags to your apps in Vesslo.");
            }
            writeln!(out, "{}", payload.title)?;
            for tag in &payload.tags {
                writeln!(out, "  {}", format_row(&tag.row))?;
            }
            Ok(())
        }
        CoreResponse::TagApps(payload) => {
            writeln!(out, "{}", payload.title)?;
            render_items(&payload.apps, out)
        }
        CoreResponse::Updates(payload) => {
            if payload.sections.is_empty() {
                return writeln!(out, "All apps are up to date! No updates available.");
            }
            for section in &payload.sections {
                writeln!(out, "{}", section.title)?;
                render_items(&section.items, out)?;
            }
            Ok(())
        }
        CoreResponse::HomebrewUpdates(payload) => {
            if payload.items.is_empty() {
                return writeln!(
                    out,
                    "All Homebrew apps are up to date! No Homebrew updates available."
                );
            }
            writeln!(out, "{}", payload.title)?;
            if let Some(header) = &payload.update_all {
                writeln!(out, "  {}", format_row(&header.row))?;
            }
            writeln!(out, "Individual Apps")?;
            render_items(&payload.items, out)
        }
        CoreResponse::Notice(notice) => writeln!(out, "{}", format_notice(notice)),
        CoreResponse::Status(status) => {
            writeln!(out, "data_path: {}", status.data_path.display())?;
            writeln!(out, "available: {}", status.available)?;
            writeln!(out, "fresh: {}", status.fresh)?;
            if let Some(exported_at) = &status.exported_at {
                writeln!(out, "exported_at: {exported_at}")?;
            }
            writeln!(out, "apps: {}", status.app_count)?;
            writeln!(out, "updates: {}", status.update_count)
        }
    }
}

fn render_items(items: &[ListItemDto], out: &mut dyn Write) -> std::io::Result<()> {
    for item in items {
        writeln!(out, "  {}  [{}]", format_row(&item.row), item.app_id)?;
    }
    Ok(())
}

pub fn format_row(row: &ListRow) -> String {
    let mut parts = vec![row.title.clone()];
    if !row.subtitle.is_empty() {
        parts.push(row.subtitle.clone());
    }
    parts.extend(row.accessories.iter().map(|accessory| match accessory {
        Accessory::Text { text } => text.clone(),
        Accessory::Tag { value, .. } => format!("[{value}]"),
        Accessory::Icon { tooltip, .. } => format!("({tooltip})"),
    }));
    parts.join("  ")
}

pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.style {
        NoticeStyle::Animated => "...",
        NoticeStyle::Success => "ok",
        NoticeStyle::Failure => "error",
    };
    match &notice.message {
        Some(message) if !message.trim().is_empty() => {
            format!("[{marker}] {}: {}", notice.title, message.trim_end())
        }
        _ => format!("[{marker}] {}", notice.title),
    }
}
