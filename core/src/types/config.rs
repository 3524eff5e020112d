use crate::error::{RadprepError, Result};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default type codes searched for
pub const DEFAULT_TYPE_CODES: [&str; 4] = ["RTF", "RTM", "RCF", "RCM"];

/// Default side codes searched for
pub const DEFAULT_SIDES: [&str; 2] = ["Right", "Left"];

/// Default upper bound for case indices (inclusive)
pub const DEFAULT_MAX_INDEX: u32 = 100;

/// Widest zero-pad accepted for indices; `u32::MAX` has ten digits
pub const MAX_INDEX_PAD_WIDTH: usize = 10;

/// Default manifest file name
pub const DEFAULT_MANIFEST_FILE: &str = "input_all_types.csv";

/// Immutable description of the identifier space and where to search it
///
/// The builder never mutates this; one configuration describes one run.
///
/// # Example
///
/// ```
/// use radprep_core::PrepConfig;
///
/// let config = PrepConfig::new("./TMJOA")
///     .with_max_index(34)
///     .with_type_codes(["RTF", "RCM"])
///     .with_sides(["Left"]);
///
/// assert_eq!(config.max_index, 34);
/// assert_eq!(config.type_codes, vec!["RTF", "RCM"]);
/// assert_eq!(config.sides, vec!["Left"]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct PrepConfig {
    /// Root directory searched recursively
    pub root: PathBuf,

    /// Ordered type codes (outer loop)
    pub type_codes: Vec<String>,

    /// Ordered side codes (second loop)
    pub sides: Vec<String>,

    /// Highest case index tried, starting from 1
    pub max_index: u32,

    /// Also try indices zero-padded to this width, after the plain form.
    /// `None` searches plain decimal indices only.
    pub index_pad_width: Option<usize>,

    /// Where the manifest is written
    pub manifest_path: PathBuf,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            type_codes: DEFAULT_TYPE_CODES.iter().map(|s| s.to_string()).collect(),
            sides: DEFAULT_SIDES.iter().map(|s| s.to_string()).collect(),
            max_index: DEFAULT_MAX_INDEX,
            index_pad_width: None,
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_FILE),
        }
    }
}

impl PrepConfig {
    /// Creates a configuration with default codes rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Builder: Set the type codes
    pub fn with_type_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: Set the side codes
    pub fn with_sides<I, S>(mut self, sides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sides = sides.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: Set the highest index tried
    pub fn with_max_index(mut self, max_index: u32) -> Self {
        self.max_index = max_index;
        self
    }

    /// Builder: Also match zero-padded indices
    ///
    /// # Example
    ///
    /// ```
    /// use radprep_core::PrepConfig;
    ///
    /// let config = PrepConfig::default().with_index_pad_width(Some(2));
    /// assert_eq!(config.index_pad_width, Some(2));
    /// ```
    pub fn with_index_pad_width(mut self, width: Option<usize>) -> Self {
        self.index_pad_width = width;
        self
    }

    /// Builder: Set the manifest path
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Number of (type, side, index) cases this configuration covers
    pub fn case_count(&self) -> usize {
        self.type_codes.len() * self.sides.len() * self.max_index as usize
    }

    /// Checks the configuration before a run
    ///
    /// # Errors
    ///
    /// Returns [`RadprepError::InvalidConfig`] if:
    /// - `max_index` is zero
    /// - the type or side list is empty, contains an empty code or repeats a code
    /// - a type code contains `_`, which would make case ids ambiguous
    /// - the index pad width is zero or wider than [`MAX_INDEX_PAD_WIDTH`]
    pub fn validate(&self) -> Result<()> {
        if self.max_index == 0 {
            return Err(RadprepError::InvalidConfig(
                "max index must be at least 1".to_string(),
            ));
        }
        if self.type_codes.is_empty() {
            return Err(RadprepError::InvalidConfig(
                "at least one type code is required".to_string(),
            ));
        }
        if self.sides.is_empty() {
            return Err(RadprepError::InvalidConfig(
                "at least one side is required".to_string(),
            ));
        }
        if self
            .type_codes
            .iter()
            .chain(self.sides.iter())
            .any(|code| code.is_empty())
        {
            return Err(RadprepError::InvalidConfig(
                "type and side codes must not be empty".to_string(),
            ));
        }
        if let Some(code) = self.type_codes.iter().find(|code| code.contains('_')) {
            return Err(RadprepError::InvalidConfig(format!(
                "type code {} must not contain '_'",
                code
            )));
        }
        if let Some(code) = first_repeat(&self.type_codes) {
            return Err(RadprepError::InvalidConfig(format!(
                "type code {} is listed more than once",
                code
            )));
        }
        if let Some(side) = first_repeat(&self.sides) {
            return Err(RadprepError::InvalidConfig(format!(
                "side {} is listed more than once",
                side
            )));
        }
        if let Some(width) = self.index_pad_width {
            if width == 0 || width > MAX_INDEX_PAD_WIDTH {
                return Err(RadprepError::InvalidConfig(format!(
                    "index pad width must be between 1 and {}, got {}",
                    MAX_INDEX_PAD_WIDTH, width
                )));
            }
        }
        Ok(())
    }
}

fn first_repeat(codes: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .find(|code| !seen.insert(code.as_str()))
        .map(String::as_str)
}
