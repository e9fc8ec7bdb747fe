#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

pub use unused_modules_test_utils::builders::{PluginOptionsBuilder, ProjectBuilder};
pub use unused_modules_test_utils::fake_host::{FakeCompilation, Reply};
pub use unused_modules_test_utils::{init_tracing, with_timeout};

use unused_modules::fs::mock::MockFileSystem;

pub const ROOT: &str = "/project";

/// The canonical project:
/// - `src/index.ts` entry importing `src/used.ts`
/// - `src/dead.ts` imported by nothing
/// - `src/note.md` covered by the default excludes
pub fn example_project() -> MockFileSystem {
    ProjectBuilder::new(ROOT)
        .file("src/index.ts")
        .file("src/used.ts")
        .file("src/dead.ts")
        .file("src/note.md")
        .build()
}

pub fn abs(rel: &str) -> PathBuf {
    PathBuf::from(ROOT).join(rel)
}

/// A compilation over `fs` whose graph holds the given root-relative files.
pub fn compilation_with(fs: &MockFileSystem, reached: &[&str]) -> FakeCompilation {
    FakeCompilation::new(ROOT)
        .with_fs(Arc::new(fs.clone()))
        .with_resources(reached.iter().map(|rel| abs(rel)))
}
