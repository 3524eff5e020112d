use super::MaskSubtype;
use crate::error::{RadprepError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// One point of the identifier space: (type, side, index)
///
/// A case is resolved to at most one image and up to one mask per
/// [`MaskSubtype`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseKey {
    pub type_code: String,
    pub side: String,
    pub index: u32,
}

impl CaseKey {
    /// Creates a new CaseKey
    pub fn new(type_code: impl Into<String>, side: impl Into<String>, index: u32) -> Self {
        Self {
            type_code: type_code.into(),
            side: side.into(),
            index,
        }
    }

    /// Returns the case id for one of this case's masks
    pub fn case_id(&self, subtype: MaskSubtype) -> CaseId {
        CaseId {
            subtype,
            key: self.clone(),
        }
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.side, self.type_code, self.index)
    }
}

/// Manifest row key: `{subtype}_{side}_{type}_{index}`
///
/// # Example
///
/// ```
/// use radprep_core::{CaseId, MaskSubtype};
///
/// let id: CaseId = "all_Right_RTF_12".parse().unwrap();
/// assert_eq!(id.subtype, MaskSubtype::All);
/// assert_eq!(id.key.side, "Right");
/// assert_eq!(id.key.type_code, "RTF");
/// assert_eq!(id.key.index, 12);
/// assert_eq!(id.to_string(), "all_Right_RTF_12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseId {
    pub subtype: MaskSubtype,
    pub key: CaseKey,
}

impl CaseId {
    /// Parses a case id
    ///
    /// The type code is the last underscore-free token before the index, so
    /// a side containing underscores still round-trips.
    ///
    /// # Errors
    ///
    /// Returns [`RadprepError::InvalidCaseId`] if the string does not match
    /// `{all|bone}_{side}_{type}_{index}`.
    pub fn parse(s: &str) -> Result<Self> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"^(all|bone)_(.+)_([^_]+)_([0-9]+)$").expect("Failed to compile regex")
        });

        let caps = re
            .captures(s)
            .ok_or_else(|| RadprepError::InvalidCaseId(s.to_string()))?;

        let subtype = MaskSubtype::parse(&caps[1])
            .ok_or_else(|| RadprepError::InvalidCaseId(s.to_string()))?;
        let index: u32 = caps[4]
            .parse()
            .map_err(|e| RadprepError::InvalidCaseId(format!("{}: {}", s, e)))?;

        Ok(CaseId {
            subtype,
            key: CaseKey::new(&caps[3], &caps[2], index),
        })
    }
}

impl FromStr for CaseId {
    type Err = RadprepError;

    fn from_str(s: &str) -> Result<Self> {
        CaseId::parse(s)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.subtype, self.key)
    }
}
