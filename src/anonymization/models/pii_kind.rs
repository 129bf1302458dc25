//! PII kind data model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of personally identifying data subject to substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiKind {
    /// Names (text, family, given, free-text display names)
    Name,
    /// Resource ids, identifier values and unclassified telecom values
    Id,
    /// Date of birth
    Dob,
    /// Address lines, city, postal code and free-text addresses
    Address,
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
    /// National identification numbers
    Ssn,
    /// Anything not covered by a more specific kind
    Other,
}

impl PiiKind {
    /// All kinds in declaration order
    pub const ALL: [PiiKind; 8] = [
        Self::Name,
        Self::Id,
        Self::Dob,
        Self::Address,
        Self::Phone,
        Self::Email,
        Self::Ssn,
        Self::Other,
    ];

    /// Upper-case label, also used as the vault key prefix
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Id => "ID",
            Self::Dob => "DOB",
            Self::Address => "ADDRESS",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Ssn => "SSN",
            Self::Other => "DEFAULT",
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PiiKind {
    type Err = std::convert::Infallible;

    /// Unknown labels map to [`PiiKind::Other`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "NAME" => Self::Name,
            "ID" => Self::Id,
            "DOB" => Self::Dob,
            "ADDRESS" => Self::Address,
            "PHONE" => Self::Phone,
            "EMAIL" => Self::Email,
            "SSN" => Self::Ssn,
            _ => Self::Other,
        })
    }
}
