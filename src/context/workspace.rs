use anyhow::{Context, Result};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};

use super::source::{ContextCandidate, ContextCatalog, ContextKind};
use crate::app::ContextConfig;
use crate::utils::DossierError;

/// Offers the files of a local checkout as context candidates
pub struct WorkspaceCatalog {
    root: PathBuf,
    name: String,
    max_files: usize,
    exclude_dirs: Vec<String>,
}

impl WorkspaceCatalog {
    pub fn new(root: impl AsRef<Path>, config: &ContextConfig) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .map_err(DossierError::from)
            .with_context(|| format!("Cannot open workspace: {}", root.as_ref().display()))?;
        if !root.is_dir() {
            return Err(DossierError::ContextError(format!(
                "workspace is not a directory: {}",
                root.display()
            ))
            .into());
        }
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        Ok(Self {
            root,
            name,
            max_files: config.max_files,
            exclude_dirs: config.exclude_dirs.clone(),
        })
    }
}

impl ContextCatalog for WorkspaceCatalog {
    fn repo_name(&self) -> &str {
        &self.name
    }

    fn candidates(&self) -> Result<Vec<ContextCandidate>> {
        let exclude_dirs = self.exclude_dirs.clone();
        let mut walker = WalkBuilder::new(&self.root);
        walker
            .standard_filters(true) // Respect .gitignore, .ignore, etc.
            .hidden(true)
            .parents(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_excluded_dir(entry, &exclude_dirs));

        let mut candidates = Vec::new();
        for result in walker.build() {
            if candidates.len() >= self.max_files {
                break;
            }
            let entry = result?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let kind = ContextKind::infer(&relative);
            candidates.push(ContextCandidate::new(relative, kind));
        }

        Ok(candidates)
    }
}

fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
    if !is_dir || entry.depth() == 0 {
        return false;
    }
    let dir_name = entry.file_name().to_string_lossy();
    exclude_dirs.iter().any(|skip| dir_name == skip.as_str())
}
