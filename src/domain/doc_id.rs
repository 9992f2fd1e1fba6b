use std::{fmt, str::FromStr};

use crate::domain::{number, ArticleNumber};

/// The hierarchy a document belongs to.
///
/// `Code` entries come from the international laws of bridge; `Rnc` entries
/// from the national competition regulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hierarchy {
    /// International code law.
    Code,
    /// National competition regulation article.
    Rnc,
}

impl Hierarchy {
    /// The canonical uppercase tag used in identifiers and filenames.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Code => "CODE",
            Self::Rnc => "RNC",
        }
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Hierarchy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CODE" => Ok(Self::Code),
            "RNC" => Ok(Self::Rnc),
            _ => Err(Error::Hierarchy(s.to_string())),
        }
    }
}

/// The identifier of a document: its hierarchy plus its article number.
///
/// Rendered as `CODE-40`, `CODE-40B.2`, `RNC-12` and so on. This is the key
/// documents are stored and cross-referenced under; there is no separate
/// surrogate id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId {
    hierarchy: Hierarchy,
    number: ArticleNumber,
}

impl DocId {
    /// Creates an identifier from pre-validated parts.
    #[must_use]
    pub const fn new(hierarchy: Hierarchy, number: ArticleNumber) -> Self {
        Self { hierarchy, number }
    }

    /// The hierarchy component.
    #[must_use]
    pub const fn hierarchy(&self) -> Hierarchy {
        self.hierarchy
    }

    /// The article number component.
    #[must_use]
    pub const fn number(&self) -> ArticleNumber {
        self.number
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.hierarchy, self.number)
    }
}

/// Errors that can occur when parsing a document identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The identifier is not of the form `HIERARCHY-NUMBER`.
    #[error("invalid document id '{0}': expected HIERARCHY-NUMBER, e.g. CODE-40")]
    Syntax(String),

    /// The hierarchy tag is not `CODE` or `RNC`.
    #[error("unknown hierarchy '{0}': expected CODE or RNC")]
    Hierarchy(String),

    /// The article number component is invalid.
    #[error(transparent)]
    Number(#[from] number::Error),
}

impl FromStr for DocId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, number) = s.split_once('-').ok_or_else(|| Error::Syntax(s.to_string()))?;

        let hierarchy = tag.parse()?;
        let number = number.parse()?;

        Ok(Self::new(hierarchy, number))
    }
}

impl TryFrom<&str> for DocId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl serde::Serialize for DocId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DocId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocId {
        s.parse().unwrap()
    }

    #[test]
    fn parse_valid_ids() {
        assert_eq!(id("CODE-40").hierarchy(), Hierarchy::Code);
        assert_eq!(id("CODE-40").number().major(), 40);
        assert_eq!(id("RNC-12").hierarchy(), Hierarchy::Rnc);
        assert_eq!(id("CODE-40B.2").to_string(), "CODE-40B.2");
    }

    #[test]
    fn parse_missing_separator() {
        assert!(matches!("CODE40".parse::<DocId>(), Err(Error::Syntax(_))));
    }

    #[test]
    fn parse_unknown_hierarchy() {
        assert!(matches!(
            "LAWS-40".parse::<DocId>(),
            Err(Error::Hierarchy(_))
        ));
        // Hierarchy tags are strict; normalization happens at the CLI boundary.
        assert!(matches!(
            "code-40".parse::<DocId>(),
            Err(Error::Hierarchy(_))
        ));
    }

    #[test]
    fn parse_bad_number() {
        assert!(matches!("CODE-x".parse::<DocId>(), Err(Error::Number(_))));
        assert!(matches!("CODE-0".parse::<DocId>(), Err(Error::Number(_))));
    }

    #[test]
    fn ordering_groups_by_hierarchy_then_number() {
        let mut ids = vec![id("RNC-1"), id("CODE-400"), id("CODE-7"), id("CODE-40")];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["CODE-7", "CODE-40", "CODE-400", "RNC-1"]);
    }

    #[test]
    fn display_round_trip() {
        for input in ["CODE-40", "RNC-12", "CODE-40B.2"] {
            assert_eq!(id(input).to_string(), input);
        }
    }

    #[test]
    fn serde_round_trip_as_string() {
        let value = id("RNC-12");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"RNC-12\"");
        assert_eq!(serde_json::from_str::<DocId>(&json).unwrap(), value);
    }
}
