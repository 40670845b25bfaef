/*!
 * Template parser configuration.
 */

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default name of the attribute annotating element content
pub const DEFAULT_ATTRIBUTE_NAME: &str = "translate";

/// Default pattern for attributes annotating other attributes
pub const DEFAULT_ATTRIBUTE_PATTERN: &str = "*.translate";

/// A pattern such as `*.translate`, matching annotation attribute names and
/// mapping them to the name of the attribute they annotate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePattern {
    pattern: String,
    prefix: String,
    suffix: String,
}

impl AttributePattern {
    /// Creates a pattern from a string containing exactly one `*` and a non-empty
    /// prefix and/or suffix. `option_name` names the setting in error messages.
    pub fn new(pattern: &str, option_name: &'static str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::AttributePattern {
            option: option_name,
            pattern: pattern.to_string(),
        };

        let mut parts = pattern.split('*');
        let (Some(prefix), Some(suffix), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        if prefix.is_empty() && suffix.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            pattern: pattern.to_string(),
            prefix: prefix.to_ascii_lowercase(),
            suffix: suffix.to_ascii_lowercase(),
        })
    }

    /// The pattern as specified
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Gets the name of the attribute annotated by `attr_name`, or `None` if
    /// `attr_name` does not match the pattern.
    pub fn target_name(&self, attr_name: &str) -> Option<String> {
        let name = attr_name.to_ascii_lowercase();

        if name.len() <= self.prefix.len() + self.suffix.len() {
            return None;
        }

        name.strip_prefix(&self.prefix)?
            .strip_suffix(&self.suffix)
            .map(str::to_string)
    }
}

impl Default for AttributePattern {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_ATTRIBUTE_PATTERN.to_string(),
            prefix: String::new(),
            suffix: ".translate".to_string(),
        }
    }
}

impl std::fmt::Display for AttributePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Settings for `TemplateParser`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParserConfig {
    /// Name of the attribute annotating element content
    pub attribute_name: String,

    /// Pattern for attributes annotating other attributes
    pub attribute_pattern: AttributePattern,

    /// Whether a pattern-matched attribute without target attribute holds
    /// its own content, instead of being an error
    pub allow_direct_annotation: bool,
}

impl TemplateParserConfig {
    /// Creates a configuration, validating the attribute name and pattern
    pub fn new(
        attribute_name: &str,
        attribute_pattern: &str,
        allow_direct_annotation: bool,
    ) -> Result<Self, ConfigError> {
        if attribute_name.trim().is_empty() {
            return Err(ConfigError::AttributeName);
        }

        Ok(Self {
            attribute_name: attribute_name.to_ascii_lowercase(),
            attribute_pattern: AttributePattern::new(attribute_pattern, "attributePattern")?,
            allow_direct_annotation,
        })
    }
}

impl Default for TemplateParserConfig {
    fn default() -> Self {
        Self {
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            attribute_pattern: AttributePattern::default(),
            allow_direct_annotation: false,
        }
    }
}

/// How annotations are left in a template after export or import
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreserveAnnotations {
    /// Remove all annotations
    #[default]
    None,
    /// Replace annotations with the standard `translate` attribute where needed
    Standard,
    /// Keep annotations, reducing their values to `yes` or `no`
    Normalize,
    /// Keep annotations unchanged
    All,
}

impl std::fmt::Display for PreserveAnnotations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Standard => write!(f, "standard"),
            Self::Normalize => write!(f, "normalize"),
            Self::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for PreserveAnnotations {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "normalize" => Ok(Self::Normalize),
            "all" => Ok(Self::All),
            _ => Err(ConfigError::PreserveAnnotations(s.to_string())),
        }
    }
}
