use serde::{Deserialize, Serialize};

use crate::literal::Dialect;

/// Code sample language shown as one tab on an endpoint page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Curl,
    JavaScript,
    Python,
    Php,
}

impl Representation {
    /// Tab order on every page.
    pub const ALL: [Representation; 4] = [
        Representation::Curl,
        Representation::JavaScript,
        Representation::Python,
        Representation::Php,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Php => "php",
        }
    }

    /// Parse a tab tag. Common short names are accepted too.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "curl" | "shell" | "sh" | "bash" => Some(Self::Curl),
            "javascript" | "js" => Some(Self::JavaScript),
            "python" | "py" => Some(Self::Python),
            "php" => Some(Self::Php),
            _ => None,
        }
    }

    /// Tab caption.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Curl => "cURL",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Php => "PHP",
        }
    }

    /// Literal syntax of payloads embedded in this representation.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Curl => Dialect::Json,
            Self::JavaScript => Dialect::JavaScript,
            Self::Python => Dialect::Python,
            Self::Php => Dialect::Php,
        }
    }

    /// File extension used to pick a syntax definition for highlighting.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Curl => "sh",
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::Php => "php",
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_tags_and_aliases() {
        for representation in Representation::ALL {
            assert_eq!(
                Representation::parse(representation.as_str()),
                Some(representation)
            );
        }
        assert_eq!(Representation::parse(" JS "), Some(Representation::JavaScript));
        assert_eq!(Representation::parse("shell"), Some(Representation::Curl));
        assert_eq!(Representation::parse("ruby"), None);
    }

    #[test]
    fn test_serde_uses_tab_tags() {
        let json = serde_json::to_string(&Representation::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let parsed: Representation = serde_json::from_str("\"php\"").unwrap();
        assert_eq!(parsed, Representation::Php);
    }
}
