//! CLI subcommands for the background sync daemon.
//!
//! `tandem daemon start-sync` runs the daemon in the foreground until Ctrl+C
//! or SIGTERM; it holds `daemon.state.json.lock` for its lifetime and
//! publishes its state to `daemon.state.json`. Files left behind by a dead
//! process are detected by PID.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tandem_core::Configuration;

/// Daemon management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum DaemonAction {
    /// Run the sync daemon in the foreground until interrupted.
    StartSync,
    /// Show the state of a running daemon.
    Status,
}

/// Contents of `daemon.state.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonState {
    pub pid: u32,
    pub started_at_secs: u64,
    pub cli_version: String,
    pub server_url: String,
}

/// Exclusive hold on the daemon lock file; removed on drop.
#[derive(Debug)]
pub struct DaemonLock {
    path: PathBuf,
}

impl DaemonLock {
    /// Create the lock file, failing if a live daemon holds it.
    ///
    /// A lock whose recorded PID is no longer running is removed and
    /// re-acquired.
    pub fn acquire(path: &Path) -> Result<Self> {
        let created = match create_lock_file(path) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && lock_is_stale(path) => {
                warn!(path = %path.display(), "removing stale daemon lock");
                fs::remove_file(path)
                    .with_context(|| format!("Failed to remove stale lock {}", path.display()))?;
                create_lock_file(path)
            }
            result => result,
        };
        let mut file = created.with_context(|| {
            format!(
                "Failed to acquire daemon lock {} (is another daemon running?)",
                path.display()
            )
        })?;
        writeln!(file, "{}", std::process::id())
            .with_context(|| format!("Failed to write daemon lock: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for DaemonLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove daemon lock");
        }
    }
}

fn create_lock_file(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// PID recorded in a lock file, if it holds one.
fn lock_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn lock_is_stale(path: &Path) -> bool {
    lock_pid(path).is_some_and(|pid| !pid_alive(pid))
}

/// Whether a process with this PID exists.
#[cfg(unix)]
pub fn pid_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => !matches!(kill(Pid::from_raw(raw), None), Err(Errno::ESRCH)),
        _ => false,
    }
}

#[cfg(not(unix))]
pub const fn pid_alive(_pid: u32) -> bool {
    true
}

/// Write the daemon state JSON file.
pub fn write_state(path: &Path, state: &DaemonState) -> Result<()> {
    let json =
        serde_json::to_string_pretty(state).context("Failed to serialize daemon state to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write daemon state: {}", path.display()))
}

/// Read the daemon state file. `None` when no daemon has published one.
pub fn read_state(path: &Path) -> Result<Option<DaemonState>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse daemon state: {}", path.display()))?;
    Ok(Some(state))
}

/// State of the daemon that is actually running, if any.
///
/// A state file left behind by a dead process reads as `None`.
pub fn running_state(path: &Path) -> Result<Option<DaemonState>> {
    Ok(read_state(path)?.filter(|state| {
        let alive = pid_alive(state.pid);
        if !alive {
            warn!(pid = state.pid, path = %path.display(), "ignoring stale daemon state");
        }
        alive
    }))
}

/// Execute the `daemon` subcommand.
pub async fn run(action: DaemonAction, config: &Configuration) -> Result<()> {
    match action {
        DaemonAction::StartSync => start_sync(config).await,
        DaemonAction::Status => status(config),
    }
}

async fn start_sync(config: &Configuration) -> Result<()> {
    if !config.is_daemon_process() {
        warn!("daemon started with arguments before `daemon start-sync`");
    }

    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .context("Failed to install SIGTERM handler")?;

    let lock = DaemonLock::acquire(config.daemon_lock_file())?;
    let started_at_secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let state = DaemonState {
        pid: std::process::id(),
        started_at_secs,
        cli_version: config.cli_version().to_string(),
        server_url: config.server_url().to_string(),
    };
    write_state(config.daemon_state_file(), &state)?;
    info!(
        pid = state.pid,
        server = %state.server_url,
        caffeinate_disabled = config.caffeinate_disabled(),
        experimental = config.experimental_enabled(),
        "sync daemon started"
    );

    #[cfg(unix)]
    let sigterm_future = sigterm.recv();
    #[cfg(not(unix))]
    let sigterm_future = std::future::pending::<Option<()>>();

    let result = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C shutdown signal");
            result.context("Failed to listen for shutdown signal")
        }
        _ = sigterm_future => {
            info!("Received SIGTERM shutdown signal");
            Ok(())
        }
    };

    info!("sync daemon stopping");
    if let Err(e) = fs::remove_file(config.daemon_state_file()) {
        warn!(error = %e, "failed to remove daemon state file");
    }
    drop(lock);
    result
}

fn status(config: &Configuration) -> Result<()> {
    let mut out = io::stdout();
    match running_state(config.daemon_state_file())? {
        Some(state) => {
            writeln!(out, "Daemon running")?;
            writeln!(out, "PID: {}", state.pid)?;
            writeln!(out, "Started at (unix): {}", state.started_at_secs)?;
            writeln!(out, "Version: {}", state.cli_version)?;
            writeln!(out, "Server: {}", state.server_url)?;
        }
        None => {
            writeln!(out, "No daemon running")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_state() -> DaemonState {
        DaemonState {
            pid: 4242,
            started_at_secs: 1_700_000_000,
            cli_version: "0.1.0".into(),
            server_url: "https://s.test".into(),
        }
    }

    #[test]
    fn lock_is_exclusive_and_released_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json.lock");

        let lock = DaemonLock::acquire(&path).unwrap();
        assert!(path.exists());
        let err = DaemonLock::acquire(&path).unwrap_err();
        assert!(err.to_string().contains("another daemon"));

        drop(lock);
        assert!(!path.exists());
        DaemonLock::acquire(&path).unwrap();
    }

    #[test]
    fn lock_file_records_pid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lock");
        let _lock = DaemonLock::acquire(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());
    }

    /// PID of a child that has already exited and been reaped.
    #[cfg(unix)]
    fn exited_pid() -> u32 {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        pid
    }

    #[cfg(unix)]
    #[test]
    fn lock_left_by_dead_process_is_reclaimed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json.lock");
        fs::write(&path, format!("{}\n", exited_pid())).unwrap();

        let lock = DaemonLock::acquire(&path).unwrap();
        assert_eq!(lock_pid(&path), Some(std::process::id()));
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn lock_held_by_live_process_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json.lock");
        fs::write(&path, format!("{}\n", std::process::id())).unwrap();

        assert!(DaemonLock::acquire(&path).is_err());
        assert!(path.exists());
    }

    #[test]
    fn unreadable_lock_pid_is_not_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lock");
        fs::write(&path, "").unwrap();
        assert!(!lock_is_stale(&path));
        assert!(DaemonLock::acquire(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn state_from_dead_process_is_not_running() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json");
        let stale = DaemonState {
            pid: exited_pid(),
            ..sample_state()
        };
        write_state(&path, &stale).unwrap();

        assert_eq!(read_state(&path).unwrap(), Some(stale));
        assert_eq!(running_state(&path).unwrap(), None);
    }

    #[test]
    fn state_from_live_process_is_running() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json");
        let live = DaemonState {
            pid: std::process::id(),
            ..sample_state()
        };
        write_state(&path, &live).unwrap();
        assert_eq!(running_state(&path).unwrap(), Some(live));
    }

    #[cfg(unix)]
    #[test]
    fn pid_alive_checks() {
        assert!(pid_alive(std::process::id()));
        assert!(!pid_alive(exited_pid()));
        assert!(!pid_alive(0));
    }

    #[test]
    fn state_file_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json");
        write_state(&path, &sample_state()).unwrap();
        assert_eq!(read_state(&path).unwrap(), Some(sample_state()));
    }

    #[test]
    fn missing_state_file_reads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(read_state(&tmp.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn corrupt_state_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("daemon.state.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_state(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse daemon state"));
    }
}
