//! Rerun an action whenever watched paths change.
//!
//! Filesystem events are forwarded from the notify callback into a tokio
//! channel and coalesced: the action runs once the paths have been quiet for
//! [`DEBOUNCE_MS`]. Events arriving while the action runs queue up and
//! trigger at most one further run.

use miette::{miette, IntoDiagnostic, Result};
use notify::{
    event::{ModifyKind, RenameMode},
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Quiet period before a batch of events triggers a rerun.
pub const DEBOUNCE_MS: u64 = 100;

const DIVIDER_WIDTH: usize = 80;

/// Watch `roots` and call `action` after every debounced batch of changes.
///
/// A root that does not exist yet is covered by watching its nearest
/// existing ancestor, with events outside the requested roots dropped, so
/// an output directory created after startup is still picked up. Never
/// returns unless the watcher fails.
pub fn run(roots: &[PathBuf], mut action: impl FnMut()) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let scope = roots.to_vec();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if !should_process_event(&event) {
                    return;
                }
                let paths = paths_in_scope(event.paths, &scope);
                if paths.is_empty() {
                    return;
                }
                if let Err(e) = tx.send(paths) {
                    warn!(error = %e, "Failed to send watch event");
                }
            }
            Err(e) => error!(error = %e, "Watch error"),
        },
        notify::Config::default(),
    )
    .into_diagnostic()?;

    let mut watched: Vec<&Path> = Vec::new();
    for root in roots {
        let Some(target) = watch_target(root) else {
            warn!(path = %root.display(), "Not watching path with no existing ancestor");
            continue;
        };
        if watched.contains(&target) {
            continue;
        }
        if target != root.as_path() {
            info!(
                path = %root.display(),
                ancestor = %target.display(),
                "Path does not exist yet, watching ancestor"
            );
        }
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(target, mode).into_diagnostic()?;
        info!(path = %target.display(), "Watching");
        watched.push(target);
    }

    if watched.is_empty() {
        return Err(miette!(
            code = "NOTHING_TO_WATCH",
            "None of the watched paths exist: {}",
            roots
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .into_diagnostic()?;

    runtime.block_on(process_events(&mut rx, &mut action));

    // Keep the watcher alive for as long as events are processed.
    drop(watcher);
    Ok(())
}

/// Coalesce events and run `action` once per quiet period.
async fn process_events(
    rx: &mut mpsc::UnboundedReceiver<Vec<PathBuf>>,
    action: &mut impl FnMut(),
) {
    let mut pending: HashSet<PathBuf> = HashSet::new();

    loop {
        let next = tokio::time::timeout(Duration::from_millis(DEBOUNCE_MS), rx.recv()).await;

        match next {
            Ok(Some(paths)) => pending.extend(paths),
            Ok(None) => {
                debug!("Watch event channel closed");
                break;
            }
            Err(_) => {
                if pending.is_empty() {
                    continue;
                }
                debug!(count = pending.len(), "Processing coalesced file events");
                for path in &pending {
                    debug!(path = %path.display(), "File changed");
                }
                pending.clear();

                println!("{}", "-".repeat(DIVIDER_WIDTH));
                action();
            }
        }
    }
}

/// Content changes only: metadata events and hidden files (including our
/// own atomic-write temp files) are ignored.
fn should_process_event(event: &Event) -> bool {
    let relevant = match &event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => true,
        EventKind::Modify(ModifyKind::Name(
            RenameMode::To | RenameMode::From | RenameMode::Both | RenameMode::Any,
        )) => true,
        _ => false,
    };

    relevant && event.paths.iter().any(|p| !is_hidden(p))
}

/// The path to hand to the watcher for `root`: the root itself, or its
/// nearest ancestor that exists.
fn watch_target(root: &Path) -> Option<&Path> {
    root.ancestors().find(|p| p.exists())
}

/// Keep the visible paths that fall under one of the requested roots.
fn paths_in_scope(paths: Vec<PathBuf>, roots: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|p| !is_hidden(p) && roots.iter().any(|root| p.starts_with(root)))
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_content_changes_are_processed() {
        assert!(should_process_event(&event(
            EventKind::Create(CreateKind::File),
            "/p/dist/a.js"
        )));
        assert!(should_process_event(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/p/dist/a.js"
        )));
        assert!(should_process_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            "/p/dist/a.js"
        )));
    }

    #[test]
    fn test_metadata_changes_are_ignored() {
        assert!(!should_process_event(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            "/p/dist/a.js"
        )));
        assert!(!should_process_event(&event(
            EventKind::Access(AccessKind::Any),
            "/p/dist/a.js"
        )));
    }

    #[test]
    fn test_hidden_files_are_ignored() {
        assert!(!should_process_event(&event(
            EventKind::Create(CreateKind::File),
            "/p/dist/.a.js.tmp.1.0"
        )));
    }

    #[tokio::test]
    async fn test_events_are_coalesced_into_one_run() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(vec![PathBuf::from("/p/dist/a.js")]).unwrap();
        tx.send(vec![PathBuf::from("/p/dist/b.js")]).unwrap();
        tx.send(vec![PathBuf::from("/p/dist/a.js")]).unwrap();

        let sender = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 4)).await;
            drop(sender);
        });
        drop(tx);

        let mut runs = 0;
        process_events(&mut rx, &mut || runs += 1).await;
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_missing_root_watches_nearest_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        assert_eq!(watch_target(&out), Some(dir.path()));
        assert_eq!(watch_target(&out.join("lib")), Some(dir.path()));

        std::fs::create_dir(&out).unwrap();
        assert_eq!(watch_target(&out), Some(out.as_path()));
    }

    #[test]
    fn test_events_outside_roots_are_dropped() {
        let roots = vec![PathBuf::from("/p/dist"), PathBuf::from("/p/tsconfig.json")];
        let paths = vec![
            PathBuf::from("/p/dist/a.js"),
            PathBuf::from("/p/src/a.ts"),
            PathBuf::from("/p/distant/b.js"),
            PathBuf::from("/p/tsconfig.json"),
            PathBuf::from("/p/dist/.a.js.tmp.1.0"),
        ];
        assert_eq!(
            paths_in_scope(paths, &roots),
            vec![
                PathBuf::from("/p/dist/a.js"),
                PathBuf::from("/p/tsconfig.json")
            ]
        );
    }

    #[test]
    fn test_nothing_to_watch_fails() {
        let err = run(&[PathBuf::new()], || {}).unwrap_err();
        assert!(err.to_string().contains("None of the watched paths exist"));
    }
}
