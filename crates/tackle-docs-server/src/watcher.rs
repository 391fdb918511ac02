//! File watching for live reload.
//!
//! Watches `docs.toml` and the local stylesheets it lists. The parent
//! directories are watched rather than the files themselves so editors that
//! save by renaming still produce events.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The configuration file was written
    ConfigModified(PathBuf),

    /// A stylesheet was written
    StyleModified(PathBuf),

    /// A watched file was removed
    Deleted(PathBuf),
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the configuration file and the given stylesheets.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        config: &Path,
        styles: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let config = absolute(config);
        let targets: HashSet<PathBuf> = std::iter::once(config.clone())
            .chain(styles.iter().map(|p| absolute(p)))
            .collect();

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let dirs: HashSet<PathBuf> = targets
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();
        for dir in &dirs {
            if dir.exists() {
                watcher
                    .watch(dir, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::warn!("Not watching missing directory {}", dir.display());
            }
        }

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;

            while let Ok(event) = sync_rx.recv() {
                for path in event.paths {
                    if !targets.contains(&path) {
                        continue;
                    }

                    // Debounce rapid events
                    let now = Instant::now();
                    if last_event_time.is_some_and(|t| now.duration_since(t) < DEBOUNCE) {
                        continue;
                    }
                    last_event_time = Some(now);

                    if let Some(e) = classify_event(&path, &event.kind, &config) {
                        let _ = async_tx.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Classify a notify event on a watched file.
fn classify_event(path: &Path, kind: &notify::EventKind, config: &Path) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Create(_) | EventKind::Modify(_) => {
            if path == config {
                Some(WatchEvent::ConfigModified(path.to_path_buf()))
            } else {
                Some(WatchEvent::StyleModified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}

/// Resolve a path the way notify reports it.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let joined = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());

    // The file may not exist yet; its directory usually does.
    match (joined.parent(), joined.file_name()) {
        (Some(dir), Some(name)) => dir
            .canonicalize()
            .map(|dir| dir.join(name))
            .unwrap_or(joined),
        _ => joined,
    }
}
