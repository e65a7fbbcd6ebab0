use relative_path::{RelativePath, RelativePathBuf};
use std::path::Path;

/// Path relative to the PAL's base directory.
///
/// ```
/// use giftdocs_base::FilePath;
///
/// let config = FilePath::from("giftdocs.toml");
/// assert_eq!(config.to_string(), "giftdocs.toml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// The relative portion as a std path, without any base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.0.as_str())
    }

    /// Resolves against a base directory.
    pub fn resolve_in(&self, base: &Path) -> std::path::PathBuf {
        self.0.to_path(base)
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_from_str_and_string() {
        assert_eq!(FilePath::from("giftdocs.toml"), FilePath::from(String::from("giftdocs.toml")));
        assert_eq!(FilePath::from("conf/site.toml").as_path(), Path::new("conf/site.toml"));
    }

    #[test]
    fn test_file_path_from_relative_path() {
        let path = FilePath::from(RelativePath::new("docs/payloads/order.json"));
        assert_eq!(path.to_string(), "docs/payloads/order.json");
    }

    #[test]
    fn test_resolve_in_base_directory() {
        let path = FilePath::from("payloads/order.json");
        let resolved = path.resolve_in(Path::new("/srv/giftdocs"));
        assert_eq!(resolved, Path::new("/srv/giftdocs/payloads/order.json"));
    }
}
