use std::fmt;

/// Mask subtype associated with an image
///
/// Each image may be paired with up to one mask of each subtype.
/// Iteration order is fixed: `All` is always evaluated before `Bone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum MaskSubtype {
    All,
    Bone,
}

/// Mask subtypes in evaluation order
pub const MASK_SUBTYPES: [MaskSubtype; 2] = [MaskSubtype::All, MaskSubtype::Bone];

impl MaskSubtype {
    /// Returns the lowercase token used in filenames and case ids
    pub fn simple_name(&self) -> &'static str {
        match self {
            MaskSubtype::All => "all",
            MaskSubtype::Bone => "bone",
        }
    }

    /// Parses a mask subtype token
    ///
    /// Returns `None` for anything other than `all` or `bone` (case-sensitive,
    /// matching how the token appears in filenames).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(MaskSubtype::All),
            "bone" => Some(MaskSubtype::Bone),
            _ => None,
        }
    }
}

impl fmt::Display for MaskSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Output format accepted by the feature-extraction tool (`-f`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum FeatureFormat {
    #[default]
    Csv,
    Json,
    Txt,
}

impl FeatureFormat {
    /// Returns the value passed on the tool's command line
    pub fn simple_name(&self) -> &'static str {
        match self {
            FeatureFormat::Csv => "csv",
            FeatureFormat::Json => "json",
            FeatureFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for FeatureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_subtype_order() {
        assert_eq!(MASK_SUBTYPES[0], MaskSubtype::All);
        assert_eq!(MASK_SUBTYPES[1], MaskSubtype::Bone);
        assert!(MaskSubtype::All < MaskSubtype::Bone);
    }

    #[test]
    fn test_mask_subtype_parse() {
        assert_eq!(MaskSubtype::parse("all"), Some(MaskSubtype::All));
        assert_eq!(MaskSubtype::parse("bone"), Some(MaskSubtype::Bone));
        assert_eq!(MaskSubtype::parse("Bone"), None);
        assert_eq!(MaskSubtype::parse(""), None);
    }

    #[test]
    fn test_feature_format_names() {
        assert_eq!(FeatureFormat::default(), FeatureFormat::Csv);
        assert_eq!(FeatureFormat::Json.to_string(), "json");
        assert_eq!(FeatureFormat::Txt.simple_name(), "txt");
    }
}
