//! Generator configuration, built from CLI flags and validated up front.

use crate::error::ConfigError;
use crate::model::Visibility;
use std::path::{Path, PathBuf};

/// Output format of the generated pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Html,
}

impl Format {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "markdown" | "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Which non-public members are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityFilter {
    pub show_private: bool,
    pub show_protected: bool,
}

impl VisibilityFilter {
    pub fn allows(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => true,
            Visibility::Protected => self.show_protected,
            Visibility::Private => self.show_private,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub project_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source_roots: Vec<PathBuf>,
    pub example_roots: Vec<PathBuf>,
    pub library_roots: Vec<PathBuf>,
    pub format: Format,
    pub visibility: VisibilityFilter,
}

impl GeneratorConfig {
    pub fn new(project_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            output_dir: output_dir.into(),
            source_roots: Vec::new(),
            example_roots: Vec::new(),
            library_roots: Vec::new(),
            format: Format::Markdown,
            visibility: VisibilityFilter::default(),
        }
    }

    /// Roots are relative to the project directory unless absolute.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if root.is_absolute() {
            root.to_path_buf()
        } else {
            self.project_dir.join(root)
        }
    }

    pub fn source_dirs(&self) -> Vec<PathBuf> {
        self.source_roots.iter().map(|r| self.resolve(r)).collect()
    }

    pub fn example_dirs(&self) -> Vec<PathBuf> {
        self.example_roots.iter().map(|r| self.resolve(r)).collect()
    }

    pub fn library_dirs(&self) -> Vec<PathBuf> {
        self.library_roots.iter().map(|r| self.resolve(r)).collect()
    }

    /// Check every configured directory before anything is written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.project_dir.is_dir() {
            return Err(ConfigError::ProjectDirNotFound(self.project_dir.clone()));
        }
        if self.source_roots.is_empty() {
            return Err(ConfigError::NoSourceRoots);
        }
        if let Some(missing) = self.source_dirs().into_iter().find(|d| !d.is_dir()) {
            return Err(ConfigError::SourceRootNotFound(missing));
        }
        if let Some(missing) = self.example_dirs().into_iter().find(|d| !d.is_dir()) {
            return Err(ConfigError::ExampleRootNotFound(missing));
        }
        if let Some(missing) = self.library_dirs().into_iter().find(|d| !d.is_dir()) {
            return Err(ConfigError::LibraryRootNotFound(missing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn format_names() {
        assert_eq!(Format::parse("md").unwrap(), Format::Markdown);
        assert_eq!(Format::parse("html").unwrap(), Format::Html);
        let err = Format::parse("json").unwrap_err();
        assert_eq!(err.to_string(), "unknown format: json. Use markdown or html");
    }

    #[test]
    fn visibility_filter() {
        let filter = VisibilityFilter::default();
        assert!(filter.allows(Visibility::Public));
        assert!(!filter.allows(Visibility::Protected));
        assert!(!filter.allows(Visibility::Private));

        let all = VisibilityFilter {
            show_private: true,
            show_protected: true,
        };
        assert!(all.allows(Visibility::Private));
    }

    #[test]
    fn validate_reports_missing_roots() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let mut config = GeneratorConfig::new(dir.path(), dir.path().join("out"));
        assert!(matches!(config.validate(), Err(ConfigError::NoSourceRoots)));

        config.source_roots.push("src".into());
        assert!(config.validate().is_ok());

        config.example_roots.push("examples".into());
        assert!(matches!(config.validate(), Err(ConfigError::ExampleRootNotFound(_))));
    }

    #[test]
    fn relative_roots_resolve_against_project() {
        let config = GeneratorConfig::new("/project", "/out");
        assert_eq!(config.resolve(Path::new("src")), PathBuf::from("/project/src"));
        assert_eq!(config.resolve(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
