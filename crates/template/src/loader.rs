//! Template file lookup across an ordered include path.

use std::path::PathBuf;

use crate::error::TemplateError;
use crate::template::Template;

/// Extension appended to template names that carry none.
pub const DEFAULT_EXTENSION: &str = "tpl";

/// An ordered list of root directories searched for template files.
///
/// The first root containing the requested file wins. With no roots
/// configured, the working directory is searched.
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader {
    roots: Vec<PathBuf>,
}

impl TemplateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader with a single include root.
    pub fn with_root(path: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let mut loader = Self::new();
        loader.add_root(path)?;
        Ok(loader)
    }

    /// Append an include root. The directory must exist.
    pub fn add_root(&mut self, path: impl Into<PathBuf>) -> Result<&mut Self, TemplateError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(TemplateError::MissingRoot(path));
        }
        self.roots.push(path);
        Ok(self)
    }

    /// Replace all include roots with a single new one.
    pub fn set_root(&mut self, path: impl Into<PathBuf>) -> Result<&mut Self, TemplateError> {
        self.clear();
        self.add_root(path)
    }

    /// Drop all include roots.
    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve a template name to the first matching file on the include
    /// path. Names without an extension get `.tpl` appended. Fails with a
    /// not-found error naming every root searched.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, TemplateError> {
        let mut file_name = name.to_string();
        if !file_name.contains('.') {
            file_name.push('.');
            file_name.push_str(DEFAULT_EXTENSION);
        }

        let cwd = [PathBuf::from(".")];
        let roots: &[PathBuf] = if self.roots.is_empty() {
            &cwd
        } else {
            &self.roots
        };

        for root in roots {
            let candidate = root.join(&file_name);
            if candidate.is_file() {
                log::debug!("template '{}' resolved to {}", name, candidate.display());
                return Ok(candidate);
            }
        }

        Err(TemplateError::NotFound {
            name: file_name,
            searched: roots.to_vec(),
        })
    }

    /// Resolve, read and parse a template.
    pub fn load(&self, name: &str) -> Result<Template, TemplateError> {
        Template::from_file(self.resolve(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_root_is_rejected() {
        let mut loader = TemplateLoader::new();
        let error = loader.add_root("/no/such/directory").unwrap_err();
        assert!(matches!(error, TemplateError::MissingRoot(_)));
    }

    #[test]
    fn test_resolve_appends_default_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.tpl"), "hello").unwrap();

        let loader = TemplateLoader::with_root(dir.path()).unwrap();
        let resolved = loader.resolve("page").unwrap();
        assert_eq!(resolved, dir.path().join("page.tpl"));
    }

    #[test]
    fn test_first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("page.tpl"), "first").unwrap();
        fs::write(second.path().join("page.tpl"), "second").unwrap();

        let mut loader = TemplateLoader::new();
        loader
            .add_root(first.path())
            .unwrap()
            .add_root(second.path())
            .unwrap();

        let template = loader.load("page").unwrap();
        assert_eq!(template.source(), "first");
        assert_eq!(template.path(), Some(first.path().join("page.tpl").as_path()));
    }

    #[test]
    fn test_not_found_lists_searched_roots() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        let mut loader = TemplateLoader::new();
        loader
            .add_root(first.path())
            .unwrap()
            .add_root(second.path())
            .unwrap();

        let error = loader.load("nope").unwrap_err();
        let TemplateError::NotFound { name, searched } = error else {
            panic!("expected a not-found error");
        };
        assert_eq!(name, "nope.tpl");
        assert_eq!(searched, vec![first.path().to_path_buf(), second.path().to_path_buf()]);
    }

    #[test]
    fn test_explicit_extension_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mail.txt"), "x").unwrap();

        let loader = TemplateLoader::with_root(dir.path()).unwrap();
        assert_eq!(loader.resolve("mail.txt").unwrap(), dir.path().join("mail.txt"));
    }
}
