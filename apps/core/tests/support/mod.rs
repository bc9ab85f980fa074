#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use vesslo_core::action_executor::{CommandOutput, CommandRunner};
use vesslo_core::config::Config;
use vesslo_core::core_service::VessloService;
use vesslo_core::model::{VessloApp, VessloData};

pub const SNAPSHOT_JSON: &str = r#"{
  "exportedAt": "2025-03-01T09:00:00Z",
  "updateCount": 6,
  "apps": [
    {
      "id": "arc",
      "name": "Arc",
      "bundleId": "company.thebrowser.Browser",
      "version": "1.2",
      "targetVersion": "1.3",
      "developer": "The Browser Company",
      "path": "/Applications/Arc.app",
      "icon": "iVBORw0KGgo=",
      "tags": ["browser", "daily"],
      "memo": "Main browser",
      "sources": ["Brew"],
      "appStoreId": null,
      "homebrewCask": "arc"
    },
    {
      "id": "slack",
      "name": "Slack",
      "bundleId": "com.tinyspeck.slackmacgap",
      "version": "4.0",
      "targetVersion": null,
      "developer": "Slack Technologies",
      "path": "/Applications/Slack.app",
      "icon": null,
      "tags": ["work", "chat", "daily"],
      "memo": null,
      "sources": ["App Store"],
      "appStoreId": "803453959",
      "homebrewCask": null
    },
    {
      "id": "iterm",
      "name": "iTerm",
      "bundleId": "com.googlecode.iterm2",
      "version": "3.4",
      "targetVersion": "3.5",
      "developer": "George Nachman",
      "path": "/Applications/iTerm.app",
      "icon": null,
      "tags": ["dev"],
      "memo": "terminal of choice",
      "sources": ["Sparkle", "Brew"],
      "appStoreId": null,
      "homebrewCask": "iterm2"
    },
    {
      "id": "xcode",
      "name": "Xcode",
      "bundleId": "com.apple.dt.Xcode",
      "version": "15.0",
      "targetVersion": "15.1",
      "developer": "Apple",
      "path": "/Applications/Xcode.app",
      "icon": null,
      "tags": ["dev"],
      "memo": null,
      "sources": ["App Store"],
      "appStoreId": "497799835",
      "homebrewCask": null
    },
    {
      "id": "obsidian",
      "name": "Obsidian",
      "bundleId": "md.obsidian",
      "version": "1.4",
      "targetVersion": "1.5",
      "developer": "Dynalist Inc.",
      "path": "/Applications/Obsidian.app",
      "icon": null,
      "tags": ["notes", "daily"],
      "memo": "Work notes vault",
      "sources": ["Sparkle"],
      "appStoreId": null,
      "homebrewCask": null
    },
    {
      "id": "legacy",
      "name": "Legacy Tool",
      "bundleId": "com.example.legacy",
      "version": "2.0",
      "targetVersion": "2.1",
      "developer": null,
      "path": "/Applications/Legacy Tool.app",
      "icon": null,
      "tags": [],
      "memo": null,
      "sources": [],
      "appStoreId": null,
      "homebrewCask": null
    },
    {
      "id": "onepassword",
      "name": "1Password",
      "bundleId": "com.1password.1password",
      "version": "8.1",
      "targetVersion": "8.2",
      "developer": "AgileBits Inc.",
      "path": "/Applications/1Password.app",
      "icon": null,
      "tags": ["security"],
      "memo": null,
      "sources": ["Brew", "App Store"],
      "appStoreId": "1333542190",
      "homebrewCask": "1password"
    }
  ]
}"#;

pub fn fixture_data() -> VessloData {
    vesslo_core::snapshot::parse(SNAPSHOT_JSON).expect("fixture snapshot should parse")
}

pub fn fixture_apps() -> Vec<VessloApp> {
    fixture_data().apps
}

pub fn ids(apps: &[&VessloApp]) -> Vec<String> {
    apps.iter().map(|app| app.id.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Records every spawn and answers with a canned output.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub output: Arc<Mutex<CommandOutput>>,
    pub spawn_fails: bool,
}

impl RecordingRunner {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            output: Arc::new(Mutex::new(CommandOutput {
                success: true,
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            })),
            ..Default::default()
        }
    }

    pub fn failing(code: i32, stderr: &str) -> Self {
        Self {
            output: Arc::new(Mutex::new(CommandOutput {
                success: false,
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            })),
            ..Default::default()
        }
    }

    pub fn unspawnable() -> Self {
        Self {
            spawn_fails: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
            stdin: stdin.map(str::to_string),
        });
        if self.spawn_fails {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            ));
        }
        Ok(self.output.lock().unwrap().clone())
    }
}

pub fn service_with(runner: &RecordingRunner) -> VessloService {
    VessloService::with_data(
        Config::default(),
        Some(fixture_data()),
        Box::new(runner.clone()),
    )
    .expect("service should initialize")
}

pub fn service_without_data(runner: &RecordingRunner) -> VessloService {
    VessloService::with_data(Config::default(), None, Box::new(runner.clone()))
        .expect("service should initialize")
}
