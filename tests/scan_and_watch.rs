// tests/scan_and_watch.rs

mod common;
use crate::common::{ROOT, abs, compilation_with, example_project, init_tracing};

use std::error::Error;
use std::path::{Path, PathBuf};

use unused_modules::config::PluginOptions;
use unused_modules::engine::{BuildRuntime, UnusedFilesPlugin};
use unused_modules::watch::WatchEvent;

type TestResult = Result<(), Box<dyn Error>>;

fn runtime() -> BuildRuntime {
    BuildRuntime::new(
        UnusedFilesPlugin::new(PluginOptions::default()),
        Path::new(ROOT),
    )
}

#[tokio::test]
async fn rescanning_an_unchanged_tree_is_idempotent() -> TestResult {
    init_tracing();

    let fs = example_project();
    let mut runtime = runtime();

    let mut first = compilation_with(&fs, &["src/index.ts"]);
    runtime.build(&mut first, None).await?;
    let after_first = runtime.plugin().files().clone();

    let mut second = compilation_with(&fs, &["src/index.ts"]);
    runtime.build(&mut second, None).await?;

    assert_eq!(runtime.plugin().files(), &after_first);
    assert_eq!(after_first.len(), 4);
    Ok(())
}

#[tokio::test]
async fn scan_never_forgets_a_deleted_file() -> TestResult {
    let fs = example_project();
    let mut runtime = runtime();

    let mut first = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    runtime.build(&mut first, None).await?;

    fs.remove(abs("src/dead.ts"));
    fs.add_file(abs("src/fresh.ts"), "");

    let mut second = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    let outcome = runtime.build(&mut second, None).await?;

    // The deleted file is still a candidate; only a watch event removes it.
    assert!(runtime.plugin().files().contains(&abs("src/dead.ts")));
    assert_eq!(
        outcome.report.files,
        vec![PathBuf::from("src/dead.ts"), PathBuf::from("src/fresh.ts")]
    );
    Ok(())
}

#[tokio::test]
async fn watch_removals_take_effect_on_the_next_build() -> TestResult {
    let fs = example_project();
    let mut runtime = runtime();

    let mut first = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    runtime.build(&mut first, None).await?;

    fs.remove(abs("src/dead.ts"));
    let event = WatchEvent::default().with_removed([abs("src/dead.ts")]);

    let mut second = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    let outcome = runtime.build(&mut second, Some(&event)).await?;

    assert!(outcome.report.is_empty());
    assert!(second.warnings.is_empty());
    assert_eq!(runtime.plugin().files().len(), 3);
    Ok(())
}

#[tokio::test]
async fn watch_additions_outside_cwd_are_still_tracked() -> TestResult {
    let fs = example_project();
    fs.add_file("/elsewhere/tool.ts", "");
    let mut runtime = runtime();

    let mut first = compilation_with(&fs, &["src/index.ts", "src/used.ts", "src/dead.ts"]);
    runtime.build(&mut first, None).await?;

    let event = WatchEvent::default()
        .with_added([PathBuf::from("/elsewhere/tool.ts"), abs("src/missing.ts")])
        .with_modified([abs("src")]);

    let mut second = compilation_with(&fs, &["src/index.ts", "src/used.ts", "src/dead.ts"]);
    let outcome = runtime.build(&mut second, Some(&event)).await?;

    let files = runtime.plugin().files();
    assert!(files.contains(Path::new("/elsewhere/tool.ts")));
    assert!(!files.contains(&abs("src/missing.ts")));
    assert!(!files.contains(&abs("src")));

    // Reported relative to root, climbing out of it.
    assert_eq!(
        outcome.report.files,
        vec![PathBuf::from("../elsewhere/tool.ts")]
    );
    Ok(())
}

#[tokio::test]
async fn path_both_added_and_removed_ends_up_removed() -> TestResult {
    let fs = example_project();
    let mut runtime = runtime();

    let mut first = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    runtime.build(&mut first, None).await?;

    let event = WatchEvent::default()
        .with_modified([abs("src/dead.ts")])
        .with_removed([abs("src/dead.ts")]);

    let mut second = compilation_with(&fs, &["src/index.ts", "src/used.ts"]);
    runtime.build(&mut second, Some(&event)).await?;

    // The next scan puts it back, since it still exists on disk.
    assert!(runtime.plugin().files().contains(&abs("src/dead.ts")));

    // ...but a standalone watch run without a scan leaves it removed.
    let mut plugin = runtime.into_plugin();
    let fs_ref: &dyn unused_modules::fs::FileSystem = &fs;
    plugin.watch_run(Some(fs_ref), &event);
    assert!(!plugin.files().contains(&abs("src/dead.ts")));
    Ok(())
}
