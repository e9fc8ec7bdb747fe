// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::watch::event_handler::WatchEvent;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Fold one notify event into the change lists of the pending rebuild.
pub fn record_event(batch: &mut WatchEvent, event: Event) {
    match event.kind {
        EventKind::Create(_) => {
            *batch = std::mem::take(batch).with_added(event.paths);
        }
        EventKind::Remove(_) => {
            *batch = std::mem::take(batch).with_removed(event.paths);
        }
        EventKind::Modify(ModifyKind::Name(mode)) => {
            let mut paths = event.paths.into_iter();
            match mode {
                RenameMode::From => *batch = std::mem::take(batch).with_removed(paths),
                RenameMode::To => *batch = std::mem::take(batch).with_added(paths),
                RenameMode::Both => {
                    let from = paths.next();
                    let to = paths.next();
                    *batch = std::mem::take(batch).with_removed(from).with_added(to);
                }
                // Unknown direction: let the updater stat both ends.
                _ => *batch = std::mem::take(batch).with_modified(paths),
            }
        }
        EventKind::Modify(_) | EventKind::Any => {
            *batch = std::mem::take(batch).with_modified(event.paths);
        }
        EventKind::Access(_) | EventKind::Other => {}
    }
}

/// Rewrite event paths under `canonical` so they sit under `root` instead.
///
/// The backend reports paths below the canonical watch root, while the
/// candidate set holds paths spelled the way `root` was given. Paths outside
/// `canonical` are left as they are.
pub fn rebase_event(mut event: Event, canonical: &Path, root: &Path) -> Event {
    if canonical == root {
        return event;
    }
    for path in &mut event.paths {
        if let Ok(rel) = path.strip_prefix(canonical) {
            *path = root.join(rel);
        }
    }
    event
}

/// Spawn a recursive watcher on `root` that turns filesystem activity into
/// `RuntimeEvent::Rebuild` events.
///
/// Events arriving within `debounce` of each other are batched into a single
/// rebuild. Reported paths keep the spelling of `root`, even when it runs
/// through a symlink.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    debounce: Duration,
) -> Result<WatcherHandle> {
    let root = root.into();
    let canonical = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // tracing may already be torn down here.
                    eprintln!("unused-modules: failed to forward notify event: {err}");
                }
            }
            Err(err) => eprintln!("unused-modules: file watch error: {err}"),
        },
        Config::default(),
    )?;

    watcher.watch(&canonical, RecursiveMode::Recursive)?;

    info!(root = ?root, canonical = ?canonical, "file watcher started");

    tokio::spawn(async move {
        while let Some(first) = event_rx.recv().await {
            let mut batch = WatchEvent::default();
            record_event(&mut batch, rebase_event(first, &canonical, &root));

            // Keep collecting until the tree has been quiet for `debounce`.
            loop {
                match tokio::time::timeout(debounce, event_rx.recv()).await {
                    Ok(Some(event)) => {
                        record_event(&mut batch, rebase_event(event, &canonical, &root))
                    }
                    Ok(None) | Err(_) => break,
                }
            }

            if batch.is_empty() {
                continue;
            }

            debug!(?batch, "forwarding batched watch event");
            if let Err(err) = runtime_tx.send(RuntimeEvent::Rebuild(batch)).await {
                warn!("failed to send RuntimeEvent::Rebuild: {err}");
                // The runtime is gone; stop watching.
                return;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn events_are_sorted_into_change_lists() {
        let mut batch = WatchEvent::default();
        record_event(&mut batch, event(EventKind::Create(CreateKind::File), &["/p/new.ts"]));
        record_event(&mut batch, event(EventKind::Remove(RemoveKind::File), &["/p/old.ts"]));
        record_event(
            &mut batch,
            event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/p/a.ts", "/p/b.ts"],
            ),
        );
        record_event(
            &mut batch,
            event(EventKind::Access(notify::event::AccessKind::Any), &["/p/read.ts"]),
        );

        let expected = WatchEvent::default()
            .with_added(["/p/new.ts", "/p/b.ts"])
            .with_removed(["/p/old.ts", "/p/a.ts"]);
        assert_eq!(batch, expected);
    }

    #[test]
    fn canonical_paths_are_rebased_onto_the_given_root() {
        let raw = event(
            EventKind::Remove(RemoveKind::File),
            &["/private/var/p/src/dead.ts", "/elsewhere/x.ts"],
        );

        let rebased = rebase_event(raw, Path::new("/private/var/p"), Path::new("/var/p"));

        assert_eq!(
            rebased.paths,
            vec![PathBuf::from("/var/p/src/dead.ts"), PathBuf::from("/elsewhere/x.ts")]
        );
    }
}
