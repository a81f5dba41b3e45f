//! Project configuration (`ttcn.json`) and source discovery.

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "ttcn.json";

pub const DEFAULT_EXTENSIONS: &[&str] = &["ttcn", "ttcn3", "ttcnpp"];

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Globs relative to the project directory. Everything when absent.
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Source extensions without the dot.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl ProjectConfig {
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(extensions) => extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A loaded project: its configuration and the directory globs are relative to.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

pub fn parse_config(source: &str) -> Result<ProjectConfig> {
    let config = serde_json::from_str(source).context("failed to parse ttcn.json")?;
    Ok(config)
}

/// Load `path`, which names either the config file or a directory holding one.
pub fn load_project(path: &Path) -> Result<Project> {
    let file = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read project file: {}", file.display()))?;
    let config = parse_config(&source)
        .with_context(|| format!("failed to load project: {}", file.display()))?;
    let root = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tracing::debug!(project = %file.display(), "loaded project");
    Ok(Project { root, config })
}

/// `ttcn.json` in `dir`, if present.
pub fn find_project(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build glob set")
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Source files of `project`, sorted.
pub fn discover_project(project: &Project) -> Result<Vec<PathBuf>> {
    let extensions = project.config.extensions();
    let include = match &project.config.include {
        Some(patterns) => Some(build_globset(patterns)?),
        None => None,
    };
    let exclude = build_globset(project.config.exclude.as_deref().unwrap_or_default())?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&project.root).follow_links(true) {
        let entry = entry.with_context(|| {
            format!("failed to walk directory: {}", project.root.display())
        })?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), &extensions) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&project.root)
            .unwrap_or(entry.path());
        if include.as_ref().is_some_and(|set| !set.is_match(relative)) {
            continue;
        }
        if exclude.is_match(relative) {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Expand command line paths: files are kept as given, directories are
/// searched for sources with one of `extensions`.
pub fn discover_paths(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if seen.insert(path.clone()) {
                files.push(path.clone());
            }
            continue;
        }
        if !path.is_dir() {
            bail!("no such file or directory: {}", path.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry =
                entry.with_context(|| format!("failed to walk directory: {}", path.display()))?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        files.extend(found.into_iter().filter(|f| seen.insert(f.clone())));
    }
    Ok(files)
}
