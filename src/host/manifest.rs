// src/host/manifest.rs

//! A build host backed by a bundler stats manifest.
//!
//! The manifest is a JSON dump of a module graph:
//!
//! ```json
//! {
//!   "context": "/project",
//!   "entries": ["./src/index.ts"],
//!   "modules": [
//!     { "identifier": "./src/index.ts", "resource": "src/index.ts",
//!       "dependencies": ["./src/used.ts"] },
//!     { "identifier": "./src/used.ts", "resource": "src/used.ts" },
//!     { "identifier": "webpack/runtime/define" }
//!   ]
//! }
//! ```
//!
//! A compilation starts with every module reachable from `entries`. Modules
//! the manifest knows about but that nothing reaches statically can still be
//! pulled in through `add_module_tree`, which is how forced inclusion finds
//! them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::{FileSystem, usable};
use crate::host::{
    BuildWarning, BuiltModule, Compilation, ModuleGraphView, ModuleTreeCallback,
    ModuleTreeRequest,
};
use crate::watch::path_utils::resolve;

#[derive(Debug, Clone, Deserialize)]
pub struct StatsManifest {
    pub context: PathBuf,
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub modules: Vec<ManifestModule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestModule {
    pub identifier: String,
    /// Backing file, absolute or relative to `context`.
    #[serde(default)]
    pub resource: Option<PathBuf>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl StatsManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file. A relative `context` is taken relative to the
    /// directory holding the manifest.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let json = fs
            .read_to_string(path)
            .with_context(|| format!("reading stats manifest {:?}", path))?;
        let mut manifest = Self::from_json(&json)?;
        if manifest.context.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            manifest.context = resolve(base, &manifest.context);
        }
        Ok(manifest)
    }
}

/// Dependency graph of a manifest, with resources resolved to absolute paths.
#[derive(Debug)]
struct ModuleIndex {
    graph: DiGraph<BuiltModule, ()>,
    by_identifier: HashMap<String, NodeIndex>,
    by_resource: HashMap<PathBuf, NodeIndex>,
}

impl ModuleIndex {
    fn new(manifest: &StatsManifest) -> Self {
        let mut graph = DiGraph::new();
        let mut by_identifier = HashMap::new();
        let mut by_resource = HashMap::new();

        for module in &manifest.modules {
            let resource = module
                .resource
                .as_ref()
                .map(|r| resolve(&manifest.context, r));
            let node = graph.add_node(BuiltModule::new(module.identifier.clone(), resource.clone()));
            by_identifier.insert(module.identifier.clone(), node);
            if let Some(resource) = resource {
                by_resource.insert(resource, node);
            }
        }

        for module in &manifest.modules {
            let from = by_identifier[&module.identifier];
            for dep in &module.dependencies {
                match by_identifier.get(dep) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => debug!(
                        module = %module.identifier,
                        dependency = %dep,
                        "dependency not listed in manifest; skipping"
                    ),
                }
            }
        }

        Self {
            graph,
            by_identifier,
            by_resource,
        }
    }

    /// Add `start` and everything it reaches to `list`.
    fn add_closure(&self, start: NodeIndex, list: &mut ModuleList) {
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            list.push(self.graph[node].clone());
        }
    }
}

/// Modules built so far, without duplicates, in build order.
#[derive(Debug, Default)]
struct ModuleList {
    modules: Vec<BuiltModule>,
    seen: HashSet<String>,
}

impl ModuleList {
    fn push(&mut self, module: BuiltModule) {
        if self.seen.insert(module.identifier.clone()) {
            self.modules.push(module);
        }
    }
}

/// One compilation of the manifest host.
#[derive(Debug)]
pub struct ManifestCompilation {
    context: PathBuf,
    fs: Option<Arc<dyn FileSystem>>,
    index: Arc<ModuleIndex>,
    building: Arc<Mutex<ModuleList>>,
    sealed: Vec<BuiltModule>,
    context_dependencies: Vec<PathBuf>,
    warnings: Vec<BuildWarning>,
}

impl ManifestCompilation {
    pub fn new(manifest: &StatsManifest, fs: Option<Arc<dyn FileSystem>>) -> Self {
        let index = ModuleIndex::new(manifest);
        let mut list = ModuleList::default();

        for entry in &manifest.entries {
            match index.by_identifier.get(entry) {
                Some(&node) => index.add_closure(node, &mut list),
                None => warn!(entry = %entry, "entry not listed in manifest"),
            }
        }
        debug!(modules = list.modules.len(), "initial module graph built from entries");

        Self {
            context: manifest.context.clone(),
            fs,
            index: Arc::new(index),
            building: Arc::new(Mutex::new(list)),
            sealed: Vec::new(),
            context_dependencies: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
    }

    pub fn context_dependencies(&self) -> &[PathBuf] {
        &self.context_dependencies
    }
}

/// Resolve one forced-inclusion request against the manifest.
fn build_tree(
    index: &ModuleIndex,
    fs: Option<&dyn FileSystem>,
    request: &ModuleTreeRequest,
    building: &Mutex<ModuleList>,
) -> anyhow::Result<BuiltModule> {
    let file = resolve(&request.context, &request.dependency.request);
    let mut list = building
        .lock()
        .map_err(|_| anyhow!("module list lock poisoned"))?;

    if let Some(&node) = index.by_resource.get(&file) {
        index.add_closure(node, &mut list);
        return Ok(index.graph[node].clone());
    }

    // Not in the manifest, but the file exists: build it as a leaf.
    if usable(fs).is_some_and(|fs| fs.is_file(&file)) {
        let module = BuiltModule::from_file(file);
        list.push(module.clone());
        return Ok(module);
    }

    Err(anyhow!(
        "Module not found: can't resolve '{}' in {:?}",
        request.dependency.request,
        request.context
    ))
}

impl Compilation for ManifestCompilation {
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
        let index = Arc::clone(&self.index);
        let building = Arc::clone(&self.building);
        let fs = self.fs.clone();

        // Reply from another task, the way a real resolver would.
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            let result = build_tree(&index, fs.as_deref(), &request, &building);
            if callback.send(result).is_err() {
                debug!(request = %request.dependency.request, "module tree requester went away");
            }
        });
    }

    fn seal(&mut self) {
        match self.building.lock() {
            Ok(list) => self.sealed = list.modules.clone(),
            Err(poisoned) => self.sealed = poisoned.into_inner().modules.clone(),
        }
    }

    fn module_graph(&self) -> &dyn ModuleGraphView {
        &self.sealed
    }

    fn push_warning(&mut self, warning: BuildWarning) {
        self.warnings.push(warning);
    }
}
