//! Index of types declared under the source and library roots.

use super::{lookup_key, TypeIntrospector, TypeSignature};
use crate::model::TypeOrigin;
use crate::parser::php;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Every type declared in the scanned files, keyed by lookup key.
#[derive(Default)]
pub struct SourceIndex {
    types: HashMap<String, TypeSignature>,
    /// Lookup keys of `Local` types, in indexing order.
    local: Vec<String>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every `.php` file under `root`. Locations are shown relative to
    /// `project_dir`.
    pub fn index_root(&mut self, root: &Path, project_dir: &Path, origin: TypeOrigin) -> Result<usize> {
        let files = collect_php_files(root)?;
        let count = files.len();
        for path in files {
            let content = match fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            tracing::debug!("parsing {}", path.display());
            let location = display_location(&path, project_dir);
            self.add_source(&content, Some(&location), origin.clone());
        }
        Ok(count)
    }

    /// Register every type declared in `content`.
    pub fn add_source(&mut self, content: &str, location: Option<&str>, origin: TypeOrigin) {
        for mut sig in php::parse(content) {
            let key = lookup_key(&sig.name);
            if let Some(existing) = self.types.get(&key) {
                tracing::warn!(
                    "duplicate declaration of {} in {}, keeping {}",
                    sig.name,
                    location.unwrap_or("<input>"),
                    existing.location.as_deref().unwrap_or("<input>")
                );
                continue;
            }
            sig.location = location.map(str::to_string);
            sig.origin = origin.clone();
            if origin == TypeOrigin::Local {
                self.local.push(key.clone());
            }
            self.types.insert(key, sig);
        }
    }

    /// Names of the types declared under the source roots.
    pub fn local_names(&self) -> Vec<String> {
        self.local
            .iter()
            .filter_map(|key| self.types.get(key))
            .map(|sig| sig.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

impl TypeIntrospector for SourceIndex {
    fn introspect(&self, name: &str) -> Option<TypeSignature> {
        self.types.get(&lookup_key(name)).cloned()
    }
}

/// All `.php` files under `root`, sorted. Entries named `_*` or `.git` are
/// skipped along with everything below them.
fn collect_php_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.php");
    let pattern = pattern.to_string_lossy();
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| !is_skipped(p.strip_prefix(root).unwrap_or(p)))
        .collect();
    // Sort for deterministic "first declaration wins"
    files.sort();
    Ok(files)
}

fn is_skipped(relative: &Path) -> bool {
    relative.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('_') || name == ".git"
    })
}

/// `/src/Acme/Widget.php` style path: project-relative, forward slashes,
/// leading `/`.
pub fn display_location(path: &Path, project_dir: &Path) -> String {
    let relative = path.strip_prefix(project_dir).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|c| c != "/" && c != ".")
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lookup_ignores_case_and_leading_separator() {
        let mut index = SourceIndex::new();
        index.add_source("<?php namespace Acme; class Widget {}", Some("/src/W.php"), TypeOrigin::Local);
        assert!(index.introspect("acme\\widget").is_some());
        assert!(index.introspect("\\Acme\\Widget").is_some());
        assert!(index.introspect("Acme\\Gadget").is_none());
        let sig = index.introspect("Acme\\Widget").unwrap();
        assert_eq!(sig.location.as_deref(), Some("/src/W.php"));
    }

    #[test]
    fn first_declaration_wins() {
        let mut index = SourceIndex::new();
        index.add_source("<?php class A { const X = 1; }", Some("/a.php"), TypeOrigin::Local);
        index.add_source("<?php class A { const Y = 2; }", Some("/b.php"), TypeOrigin::Local);
        let sig = index.introspect("A").unwrap();
        assert_eq!(sig.constants[0].name, "X");
        assert_eq!(index.local_names(), vec!["A"]);
    }

    #[test]
    fn library_types_are_not_local() {
        let mut index = SourceIndex::new();
        index.add_source("<?php class Lib {}", None, TypeOrigin::Library);
        index.add_source("<?php class Mine extends Lib {}", None, TypeOrigin::Local);
        assert_eq!(index.local_names(), vec!["Mine"]);
        assert_eq!(index.introspect("Lib").unwrap().origin, TypeOrigin::Library);
    }

    #[test]
    fn index_root_skips_underscored_entries() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("Acme")).unwrap();
        fs::create_dir_all(src.join("_private")).unwrap();
        fs::write(src.join("Acme/Widget.php"), "<?php namespace Acme; class Widget {}").unwrap();
        fs::write(src.join("_private/Hidden.php"), "<?php class Hidden {}").unwrap();
        fs::write(src.join("_skip.php"), "<?php class Skipped {}").unwrap();

        let mut index = SourceIndex::new();
        let count = index.index_root(&src, dir.path(), TypeOrigin::Local).unwrap();
        assert_eq!(count, 1);
        assert_eq!(index.local_names(), vec!["Acme\\Widget"]);
        let sig = index.introspect("Acme\\Widget").unwrap();
        assert_eq!(sig.location.as_deref(), Some("/src/Acme/Widget.php"));
    }

    #[test]
    fn display_location_is_project_relative() {
        let loc = display_location(Path::new("/p/src/A.php"), Path::new("/p"));
        assert_eq!(loc, "/src/A.php");
    }
}
