// tests/manifest_host.rs

mod common;
use crate::common::{PluginOptionsBuilder, init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use unused_modules::engine::{BuildRuntime, UnusedFilesPlugin};
use unused_modules::errors::{ModuleResolutionError, UnusedModulesError};
use unused_modules::fs::{FileSystem, RealFileSystem};
use unused_modules::host::manifest::{ManifestCompilation, StatsManifest};

type TestResult = Result<(), Box<dyn Error>>;

const STATS: &str = r#"{
    "context": ".",
    "entries": ["./src/index.ts"],
    "modules": [
        { "identifier": "./src/index.ts", "resource": "src/index.ts",
          "dependencies": ["./src/used.ts", "webpack/runtime/define"] },
        { "identifier": "./src/used.ts", "resource": "src/used.ts" },
        { "identifier": "./src/lazy.ts", "resource": "src/lazy.ts" },
        { "identifier": "webpack/runtime/define" }
    ]
}"#;

fn write(root: &Path, rel: &str, contents: &str) -> std::io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn project() -> Result<TempDir, Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path();
    write(root, "src/index.ts", "import './used';")?;
    write(root, "src/used.ts", "export {};")?;
    write(root, "src/lazy.ts", "export {};")?;
    write(root, "src/dead.ts", "export {};")?;
    write(root, "src/README.md", "# docs")?;
    write(root, "scripts/seed.ts", "export {};")?;
    write(root, "stats.json", STATS)?;
    Ok(tmp)
}

fn load(tmp: &TempDir) -> Result<(StatsManifest, Arc<dyn FileSystem>), Box<dyn Error>> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let manifest = StatsManifest::load(fs.as_ref(), &tmp.path().join("stats.json"))?;
    Ok((manifest, fs))
}

#[tokio::test]
async fn relative_context_is_anchored_to_the_manifest() -> TestResult {
    let tmp = project()?;
    let (manifest, _) = load(&tmp)?;

    assert_eq!(manifest.context, tmp.path());
    assert_eq!(manifest.entries, vec!["./src/index.ts".to_string()]);
    assert_eq!(manifest.modules.len(), 4);
    Ok(())
}

#[tokio::test]
async fn single_build_against_a_real_tree() -> TestResult {
    init_tracing();

    let tmp = project()?;
    let (manifest, fs) = load(&tmp)?;

    let mut runtime = BuildRuntime::new(
        UnusedFilesPlugin::new(PluginOptionsBuilder::new().build()),
        &manifest.context,
    );
    let mut compilation = ManifestCompilation::new(&manifest, Some(fs));
    let outcome = with_timeout(runtime.build(&mut compilation, None)).await?;

    assert_eq!(
        outcome.report.files,
        vec![
            PathBuf::from("scripts/seed.ts"),
            PathBuf::from("src/dead.ts"),
            PathBuf::from("src/lazy.ts"),
            PathBuf::from("stats.json"),
        ]
    );
    assert_eq!(compilation.warnings().len(), 1);
    assert_eq!(compilation.context_dependencies(), &[tmp.path().to_path_buf()]);
    Ok(())
}

#[tokio::test]
async fn outside_files_resolve_from_manifest_and_disk() -> TestResult {
    let tmp = project()?;
    let (manifest, fs) = load(&tmp)?;

    let options = PluginOptionsBuilder::new()
        .cwd("src")
        .outside("lazy.ts")
        .outside("../scripts/**")
        .build();
    let mut runtime = BuildRuntime::new(UnusedFilesPlugin::new(options), &manifest.context);
    let mut compilation = ManifestCompilation::new(&manifest, Some(fs));

    let outcome = with_timeout(runtime.build(&mut compilation, None)).await?;

    // scripts/ is not scanned (cwd is src/), so only lazy.ts is forced.
    assert_eq!(outcome.forced, 1);
    assert_eq!(outcome.report.files, vec![PathBuf::from("src/dead.ts")]);

    let warnings = compilation.into_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].origin, "UnusedFilesPlugin");
    assert_eq!(
        warnings[0].message,
        "Found unused files:\n  - src/dead.ts"
    );
    Ok(())
}

#[tokio::test]
async fn forced_file_that_vanished_fails_the_build() -> TestResult {
    let tmp = project()?;
    let (manifest, host_fs) = load(&tmp)?;

    let options = PluginOptionsBuilder::new().outside("src/dead.ts").build();
    let mut runtime = BuildRuntime::new(UnusedFilesPlugin::new(options), &manifest.context);

    // First build picks the file up as a candidate.
    let mut first = ManifestCompilation::new(&manifest, Some(Arc::clone(&host_fs)));
    with_timeout(runtime.build(&mut first, None)).await?;

    fs::remove_file(tmp.path().join("src/dead.ts"))?;

    let mut second = ManifestCompilation::new(&manifest, Some(host_fs));
    let result = with_timeout(runtime.build(&mut second, None)).await;

    match result {
        Err(UnusedModulesError::ModuleResolution(ModuleResolutionError::Host { file, message })) => {
            assert_eq!(file, tmp.path().join("src/dead.ts"));
            assert!(message.contains("Module not found"));
        }
        other => panic!("expected a module resolution error, got {other:?}"),
    }
    assert!(second.warnings().is_empty());
    Ok(())
}

#[test]
fn malformed_manifest_is_a_manifest_error() {
    let err = StatsManifest::from_json("{ \"entries\": [] }").unwrap_err();
    assert!(matches!(err, UnusedModulesError::ManifestError(_)));
}
