use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

pub const VESSLO_URL_SCHEME: &str = "vesslo://";

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("empty target")]
    EmptyTarget,
    #[error("path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} failed{}: {message}", exit_suffix(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Process spawning seam; the system runner is swapped out in tests.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<CommandOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn()?;
        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                if let Err(error) = pipe.write_all(input.as_bytes()) {
                    drop(pipe);
                    // Reap the child before reporting the failed write.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(error);
                }
            }
        }

        let output = child.wait_with_output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStyle {
    Animated,
    Success,
    Failure,
}

/// Status message shown to the user after (or while) an action runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub style: NoticeStyle,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notice {
    pub fn animated(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            style: NoticeStyle::Animated,
            title: title.into(),
            message,
        }
    }

    pub fn success(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            style: NoticeStyle::Success,
            title: title.into(),
            message,
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            style: NoticeStyle::Failure,
            title: title.into(),
            message: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.style == NoticeStyle::Failure
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
    pub brew: String,
    pub open: String,
    pub clipboard: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            brew: "brew".to_string(),
            open: "open".to_string(),
            clipboard: "pbcopy".to_string(),
        }
    }
}

pub struct Launcher {
    programs: Programs,
    runner: Box<dyn CommandRunner>,
}

impl Launcher {
    pub fn new(programs: Programs, runner: Box<dyn CommandRunner>) -> Self {
        Self { programs, runner }
    }

    pub fn system(programs: Programs) -> Self {
        Self::new(programs, Box::new(SystemCommandRunner))
    }

    pub fn programs(&self) -> &Programs {
        &self.programs
    }

    /// `brew upgrade --cask <cask>`; returns captured stdout.
    pub fn upgrade_cask(&self, cask: &str) -> Result<String, LaunchError> {
        let cask = non_empty(cask)?;
        self.exec(
            &self.programs.brew,
            &["upgrade".into(), "--cask".into(), cask.to_string()],
            None,
        )
    }

    pub fn upgrade_all_casks(&self) -> Result<String, LaunchError> {
        self.exec(
            &self.programs.brew,
            &["upgrade".into(), "--cask".into()],
            None,
        )
    }

    pub fn open_target(&self, target: &str) -> Result<(), LaunchError> {
        let target = non_empty(target)?;
        self.exec(&self.programs.open, &[target.to_string()], None)
            .map(|_| ())
    }

    pub fn open_path(&self, path: &str) -> Result<(), LaunchError> {
        let path = existing_path(path)?;
        self.open_target(&path.to_string_lossy())
    }

    pub fn reveal_path(&self, path: &str) -> Result<(), LaunchError> {
        let path = existing_path(path)?;
        self.exec(
            &self.programs.open,
            &["-R".into(), path.to_string_lossy().into_owned()],
            None,
        )
        .map(|_| ())
    }

    pub fn open_in_vesslo(&self, bundle_id: &str) -> Result<(), LaunchError> {
        let bundle_id = non_empty(bundle_id)?;
        self.open_target(&vesslo_app_url(bundle_id))
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<(), LaunchError> {
        let text = non_empty(text)?;
        self.exec(&self.programs.clipboard, &[], Some(text))
            .map(|_| ())
    }

    /// Upgrades one cask and reports the outcome the way the palette shows it.
    pub fn run_brew_upgrade(&self, cask: &str, app_name: &str) -> Notice {
        tracing::info!(cask, app = app_name, "brew upgrade started");
        match self.upgrade_cask(cask) {
            Ok(stdout) => {
                tracing::info!(cask, "brew upgrade finished");
                Notice::success(format!("{app_name} updated!"), Some(stdout_or_default(stdout)))
            }
            Err(error) => {
                tracing::warn!(cask, "brew upgrade failed: {error}");
                Notice::failure(format!("Failed to update {app_name}"), error.to_string())
            }
        }
    }

    pub fn run_brew_upgrade_all(&self, count: usize) -> Notice {
        tracing::info!(count, "bulk brew upgrade started");
        match self.upgrade_all_casks() {
            Ok(stdout) => Notice::success("All apps updated!", Some(stdout_or_default(stdout))),
            Err(error) => {
                tracing::warn!("bulk brew upgrade failed: {error}");
                Notice::failure("Update failed", error.to_string())
            }
        }
    }

    fn exec(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<String, LaunchError> {
        let command = display_command(program, args);
        tracing::debug!(command = %command, "spawning");
        let output = self
            .runner
            .run(program, args, stdin)
            .map_err(|source| LaunchError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if output.success {
            return Ok(output.stdout);
        }

        let stderr = output.stderr.trim();
        Err(LaunchError::Failed {
            command,
            code: output.code,
            message: if stderr.is_empty() {
                "no error output".to_string()
            } else {
                stderr.to_string()
            },
        })
    }
}

pub fn vesslo_app_url(bundle_id: &str) -> String {
    format!("{VESSLO_URL_SCHEME}app/{bundle_id}")
}

pub fn app_store_url(app_store_id: &str) -> String {
    format!("macappstore://apps.apple.com/app/id{app_store_id}")
}

/// Script-command deep link that runs the cask upgrade inside the palette.
pub fn brew_script_command_url(cask: &str) -> String {
    let quoted = serde_json::to_string(cask).unwrap_or_else(|_| format!("\"{cask}\""));
    let script = format!("brew upgrade --cask {quoted}");
    format!(
        "raycast://script-command/run?script={}",
        encode_uri_component(&script)
    )
}

pub fn brew_upgrade_command_line(cask: &str) -> String {
    format!("brew upgrade --cask {cask}")
}

/// Percent-encodes everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        let unreserved = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if unreserved {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}"))
        .unwrap_or_default()
}

fn stdout_or_default(stdout: String) -> String {
    if stdout.trim().is_empty() {
        "Update complete".to_string()
    } else {
        stdout
    }
}

fn non_empty(value: &str) -> Result<&str, LaunchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LaunchError::EmptyTarget)
    } else {
        Ok(trimmed)
    }
}

fn existing_path(path: &str) -> Result<&Path, LaunchError> {
    let candidate = Path::new(non_empty(path)?);
    if !candidate.exists() {
        return Err(LaunchError::MissingPath(candidate.to_path_buf()));
    }
    Ok(candidate)
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
