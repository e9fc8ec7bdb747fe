// tests/watcher_paths.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::os::unix::fs::symlink;
use std::time::Duration;

use tokio::sync::mpsc;

use unused_modules::engine::{CandidateFiles, RuntimeEvent};
use unused_modules::fs::{FileSystem, RealFileSystem};
use unused_modules::watch::{apply_watch_event, spawn_watcher};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn removal_through_a_symlinked_root_drops_the_candidate() -> TestResult {
    init_tracing();

    let tmp = tempfile::tempdir()?;
    let real = tmp.path().join("real");
    fs::create_dir_all(real.join("src"))?;
    fs::write(real.join("src/dead.ts"), "export {};")?;
    fs::write(real.join("src/used.ts"), "export {};")?;

    let link = tmp.path().join("link");
    symlink(&real, &link)?;

    let host_fs = RealFileSystem;
    let fs_ref: &dyn FileSystem = &host_fs;
    let mut files = CandidateFiles::new();
    files.scan(Some(fs_ref), &link);
    let dead = link.join("src/dead.ts");
    assert!(files.contains(&dead));

    let (tx, mut rx) = mpsc::channel(8);
    let _watcher = spawn_watcher(link.clone(), tx, Duration::from_millis(50))?;
    // Give the backend a moment to register the watch.
    tokio::time::sleep(Duration::from_millis(100)).await;

    fs::remove_file(&dead)?;

    let event = match with_timeout(rx.recv()).await {
        Some(RuntimeEvent::Rebuild(event)) => event,
        other => panic!("expected a rebuild, got {other:?}"),
    };
    let removed = event.removed.clone().unwrap_or_default();
    assert!(removed.contains(&dead), "removed paths: {removed:?}");

    apply_watch_event(&mut files, Some(fs_ref), &event);
    assert!(!files.contains(&dead));
    assert!(files.contains(&link.join("src/used.ts")));
    Ok(())
}
