//! Product identifier model.
//!
//! Identifiers are the normalized product or variant codes pulled out of a
//! vendor report. A composite code such as `119133-2097` carries both the
//! product id and the variant id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter between the product and variant part of a composite code
pub const VARIANT_DELIMITER: char = '-';

/// Normalized, non-empty identifier token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Trim the raw value and reject empty or whitespace-only input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Product part of the code (`119133` for `119133-2097`)
    pub fn product_id(&self) -> &str {
        match self.0.split_once(VARIANT_DELIMITER) {
            Some((product, _)) if !product.is_empty() => product,
            _ => &self.0,
        }
    }

    /// Variant part of the code, if the identifier is composite
    pub fn variant_id(&self) -> Option<&str> {
        self.0
            .split_once(VARIANT_DELIMITER)
            .map(|(_, variant)| variant)
            .filter(|variant| !variant.is_empty())
    }

    pub fn is_composite(&self) -> bool {
        self.variant_id().is_some() && self.product_id() != self.0
    }

    /// True when the token contains at least one ASCII digit
    pub fn has_digit(&self) -> bool {
        self.0.chars().any(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "identifier must not be empty".to_string())
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}
