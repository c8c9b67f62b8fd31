use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Watches a config file for changes and sends a notification on every write.
///
/// The watch is placed on the file's directory rather than the file itself,
/// so it picks up a file that does not exist yet and survives editors that
/// save by renaming a temporary file over the original.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = meter_config::ConfigWatcher::spawn("/home/user/.config/meter/meter.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed, reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    ///
    /// The watch is registered before this returns; changes made afterwards
    /// are never missed.  Must be called from within a Tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();

        match register(&path) {
            Some((watcher, events)) => {
                tokio::spawn(forward_events(watcher, events, file_name(&path), tx));
            }
            None => warn!("config hot-reload disabled for '{}'", path.display()),
        }

        (Self { path }, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn file_name(path: &Path) -> OsString {
    path.file_name().map(OsString::from).unwrap_or_default()
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

type EventRx = mpsc::Receiver<notify::Result<Event>>;

fn register(path: &Path) -> Option<(RecommendedWatcher, EventRx)> {
    let dir = watch_dir(path);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!("cannot create config directory '{}': {e}", dir.display());
    }

    let (event_tx, event_rx) = mpsc::channel::<notify::Result<Event>>(16);
    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = event_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return None;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return None;
    }

    info!("Watching config file: {}", path.display());
    Some((watcher, event_rx))
}

/// Relay events that touch `name` until the receiver goes away.
///
/// Owns `watcher` so the OS watch lives exactly as long as this task.
async fn forward_events(
    watcher: RecommendedWatcher,
    mut events: EventRx,
    name: OsString,
    tx: mpsc::Sender<()>,
) {
    let _watcher = watcher;

    while let Some(event) = events.recv().await {
        match event {
            Ok(e) => {
                // Renames arrive as `Modify(Name(_))`.
                if !matches!(e.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }
                if !e.paths.iter().any(|p| p.file_name() == Some(name.as_os_str())) {
                    continue;
                }
                debug!(kind = ?e.kind, "config file changed");
                // A full channel already holds a pending reload; coalesce.
                if let Err(mpsc::error::TrySendError::Closed(())) = tx.try_send(()) {
                    break; // receiver dropped
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
