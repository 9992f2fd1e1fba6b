use std::{fmt, str::FromStr};

/// The number of a law or regulation article.
///
/// Numbers are stored as text in the source documents ("40", "40B", "40.2"),
/// but sort numerically: a major integer, an optional uppercase letter
/// suffix, and an optional dotted sub-number.
///
/// Ordering compares the major number first, then the suffix, then the
/// sub-number, so `7 < 40 < 40.2 < 40B < 400` rather than the lexical
/// `40 < 400 < 7` a text sort would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArticleNumber {
    major: u32,
    suffix: Option<Suffix>,
    sub: Option<u32>,
}

/// A validated uppercase letter suffix (`A`-`Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Suffix(char);

impl Suffix {
    /// Creates a suffix from a character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Suffix`] if the character is not an uppercase ASCII
    /// letter.
    pub fn new(c: char) -> Result<Self, Error> {
        if c.is_ascii_uppercase() {
            Ok(Self(c))
        } else {
            Err(Error::Suffix(c))
        }
    }

    /// Returns the underlying character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl ArticleNumber {
    /// Creates a plain article number with no suffix or sub-number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Zero`] when `major` is zero; articles are numbered
    /// from 1.
    pub const fn new(major: u32) -> Result<Self, Error> {
        if major == 0 {
            return Err(Error::Zero);
        }
        Ok(Self {
            major,
            suffix: None,
            sub: None,
        })
    }

    /// Creates an article number from pre-validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Zero`] when `major` is zero.
    pub const fn with_parts(
        major: u32,
        suffix: Option<Suffix>,
        sub: Option<u32>,
    ) -> Result<Self, Error> {
        if major == 0 {
            return Err(Error::Zero);
        }
        Ok(Self { major, suffix, sub })
    }

    /// The major number component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// The letter suffix, if any.
    #[must_use]
    pub const fn suffix(&self) -> Option<Suffix> {
        self.suffix
    }

    /// The dotted sub-number, if any.
    #[must_use]
    pub const fn sub(&self) -> Option<u32> {
        self.sub
    }
}

impl fmt::Display for ArticleNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix.as_char())?;
        }
        if let Some(sub) = self.sub {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

/// Errors that can occur when parsing an article number.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input does not match the `<major>[suffix][.sub]` grammar.
    #[error("invalid article number '{0}'")]
    Syntax(String),

    /// The major component could not be parsed as an integer.
    #[error("invalid major number in '{0}'")]
    Major(String),

    /// Article numbers start at 1.
    #[error("article number cannot be zero")]
    Zero,

    /// The suffix is not an uppercase ASCII letter.
    #[error("invalid suffix '{0}': expected an uppercase letter")]
    Suffix(char),

    /// The sub-number after the dot could not be parsed as an integer.
    #[error("invalid sub-number in '{0}'")]
    Sub(String),
}

impl FromStr for ArticleNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::Syntax(s.to_string()));
        }

        // Split off the dotted sub-number, if present.
        let (head, sub) = match s.split_once('.') {
            Some((head, tail)) => {
                let sub = tail
                    .parse::<u32>()
                    .map_err(|_| Error::Sub(s.to_string()))?;
                (head, Some(sub))
            }
            None => (s, None),
        };

        // A single trailing letter is the suffix; everything before it must
        // be the major number.
        let (digits, suffix) = match head.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => {
                let digits = &head[..head.len() - c.len_utf8()];
                (digits, Some(Suffix::new(c.to_ascii_uppercase())?))
            }
            Some(_) => (head, None),
            None => return Err(Error::Syntax(s.to_string())),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Syntax(s.to_string()));
        }

        let major = digits
            .parse::<u32>()
            .map_err(|_| Error::Major(s.to_string()))?;

        Self::with_parts(major, suffix, sub)
    }
}

impl TryFrom<&str> for ArticleNumber {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl serde::Serialize for ArticleNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ArticleNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
