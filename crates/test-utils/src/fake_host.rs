use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use unused_modules::fs::FileSystem;
use unused_modules::host::{
    BuildWarning, BuiltModule, Compilation, ModuleGraphView, ModuleTreeCallback,
    ModuleTreeRequest,
};

/// How the fake host answers a module tree request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Build a module backed by the requested file after the delay.
    Module(Duration),
    /// Report an error after the delay.
    Fail(String, Duration),
    /// Drop the callback without answering.
    Drop,
}

impl Default for Reply {
    fn default() -> Self {
        Reply::Module(Duration::from_millis(5))
    }
}

/// A fake compilation that:
/// - starts from a fixed module list
/// - answers `add_module_tree` from a spawned task, as scripted per file
/// - records requests, replies and sealing in order in `log`.
pub struct FakeCompilation {
    context: PathBuf,
    fs: Option<Arc<dyn FileSystem>>,
    building: Arc<Mutex<Vec<BuiltModule>>>,
    sealed: Vec<BuiltModule>,
    scripted: HashMap<PathBuf, Reply>,
    pub log: Arc<Mutex<Vec<String>>>,
    pub requests: Vec<ModuleTreeRequest>,
    pub context_dependencies: Vec<PathBuf>,
    pub warnings: Vec<BuildWarning>,
}

impl FakeCompilation {
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            fs: None,
            building: Arc::new(Mutex::new(Vec::new())),
            sealed: Vec::new(),
            scripted: HashMap::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            requests: Vec::new(),
            context_dependencies: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn with_module(self, module: BuiltModule) -> Self {
        self.building.lock().unwrap().push(module);
        self
    }

    /// Modules backed by each of `files`, as if imported from an entry.
    pub fn with_resources<I, P>(self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for file in files {
            self.building.lock().unwrap().push(BuiltModule::from_file(file));
        }
        self
    }

    pub fn reply(mut self, file: impl Into<PathBuf>, reply: Reply) -> Self {
        self.scripted.insert(file.into(), reply);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Compilation for FakeCompilation {
    fn context(&self) -> &Path {
        &self.context
    }

    fn input_file_system(&self) -> Option<Arc<dyn FileSystem>> {
        self.fs.clone()
    }

    fn add_context_dependency(&mut self, path: &Path) {
        self.context_dependencies.push(path.to_path_buf());
    }

    fn add_module_tree(&mut self, request: ModuleTreeRequest, callback: ModuleTreeCallback) {
        let file = PathBuf::from(&request.dependency.request);
        let reply = self.scripted.get(&file).cloned().unwrap_or_default();
        let building = Arc::clone(&self.building);
        let log = Arc::clone(&self.log);

        log.lock()
            .unwrap()
            .push(format!("request:{}", file.display()));
        self.requests.push(request);

        tokio::spawn(async move {
            match reply {
                Reply::Module(delay) => {
                    tokio::time::sleep(delay).await;
                    let module = BuiltModule::from_file(file.clone());
                    building.lock().unwrap().push(module.clone());
                    log.lock().unwrap().push(format!("reply:{}", file.display()));
                    let _ = callback.send(Ok(module));
                }
                Reply::Fail(message, delay) => {
                    tokio::time::sleep(delay).await;
                    log.lock().unwrap().push(format!("fail:{}", file.display()));
                    let _ = callback.send(Err(anyhow::anyhow!(message)));
                }
                Reply::Drop => {
                    log.lock().unwrap().push(format!("drop:{}", file.display()));
                    drop(callback);
                }
            }
        });
    }

    fn seal(&mut self) {
        self.log.lock().unwrap().push("seal".to_string());
        self.sealed = self.building.lock().unwrap().clone();
    }

    fn module_graph(&self) -> &dyn ModuleGraphView {
        &self.sealed
    }

    fn push_warning(&mut self, warning: BuildWarning) {
        self.warnings.push(warning);
    }
}
