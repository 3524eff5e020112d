use crate::error::Result;
use crate::types::{CaseKey, MaskSubtype};
use globset::{GlobBuilder, GlobMatcher};
use std::fmt;

/// Suffix appended to the side in image filenames
pub const IMAGE_SUFFIX: &str = "30x30x30.nii";

/// Separator conventions accepted between type code and index
///
/// - `Compact`: `RTF12_Right...`
/// - `Underscored`: `RTF_12_Right...`
///
/// Patterns are always generated in the order of [`NAMING_CONVENTIONS`],
/// so a compact name wins over an underscored one for the same case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingConvention {
    Compact,
    Underscored,
}

/// Naming conventions in precedence order
pub const NAMING_CONVENTIONS: [NamingConvention; 2] =
    [NamingConvention::Compact, NamingConvention::Underscored];

impl NamingConvention {
    /// Returns the separator placed between type code and index
    pub fn separator(&self) -> &'static str {
        match self {
            NamingConvention::Compact => "",
            NamingConvention::Underscored => "_",
        }
    }

    /// Renders the `{type}{sep}{index}_{side}` stem shared by images and masks
    fn stem(&self, type_code: &str, index: &str, side: &str) -> String {
        format!(
            "{}{}{}_{}",
            escape_glob(type_code),
            self.separator(),
            index,
            escape_glob(side)
        )
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::Compact => write!(f, "compact"),
            NamingConvention::Underscored => write!(f, "underscored"),
        }
    }
}

/// Returns the filename suffix of a mask of the given subtype
pub fn mask_suffix(subtype: MaskSubtype) -> String {
    format!("_cropped_{}.nii", subtype.simple_name())
}

/// Builds the accepted image filename patterns for a case
///
/// Plain decimal indices come first. When `pad_width` is set, zero-padded
/// variants follow, in the same convention order, unless padding leaves the
/// index unchanged.
///
/// # Example
///
/// ```
/// use radprep_core::search::image_patterns;
/// use radprep_core::CaseKey;
///
/// let patterns = image_patterns(&CaseKey::new("RTF", "Right", 12), None);
/// assert_eq!(patterns, vec!["RTF12_Right30x30x30.nii", "RTF_12_Right30x30x30.nii"]);
/// ```
pub fn image_patterns(key: &CaseKey, pad_width: Option<usize>) -> Vec<String> {
    build_patterns(key, pad_width, IMAGE_SUFFIX)
}

/// Builds the accepted mask filename patterns for a case and mask subtype
///
/// # Example
///
/// ```
/// use radprep_core::search::mask_patterns;
/// use radprep_core::{CaseKey, MaskSubtype};
///
/// let patterns = mask_patterns(&CaseKey::new("RTF", "Right", 12), MaskSubtype::Bone, None);
/// assert_eq!(
///     patterns,
///     vec!["RTF12_Right_cropped_bone.nii", "RTF_12_Right_cropped_bone.nii"]
/// );
/// ```
pub fn mask_patterns(key: &CaseKey, subtype: MaskSubtype, pad_width: Option<usize>) -> Vec<String> {
    build_patterns(key, pad_width, &mask_suffix(subtype))
}

fn build_patterns(key: &CaseKey, pad_width: Option<usize>, suffix: &str) -> Vec<String> {
    let mut indices = vec![key.index.to_string()];
    if let Some(width) = pad_width {
        let padded = format!("{:0width$}", key.index, width = width);
        if padded != indices[0] {
            indices.push(padded);
        }
    }

    let mut patterns = Vec::with_capacity(indices.len() * NAMING_CONVENTIONS.len());
    for index in &indices {
        for convention in NAMING_CONVENTIONS {
            let stem = convention.stem(&key.type_code, index, &key.side);
            patterns.push(format!("{}{}", stem, suffix));
        }
    }
    patterns
}

/// Escapes glob metacharacters so a code is matched literally
///
/// Each metacharacter is wrapped in a single-character class (`*` → `[*]`).
pub fn escape_glob(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Compiles a filename pattern into a matcher applied to file names
///
/// Matching is case-sensitive and `*` never crosses a path separator.
///
/// # Errors
///
/// Returns [`crate::RadprepError::InvalidPattern`] if the glob is malformed.
pub fn build_matcher(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(false)
        .build()?;
    Ok(glob.compile_matcher())
}
