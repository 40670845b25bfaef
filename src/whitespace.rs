/*!
 * Whitespace normalization for exported content.
 *
 * The options `pre`, `pre-line` and `normal` behave like the CSS `white-space`
 * property. `trim`, the default for element content, behaves like `normal`
 * but also removes the whitespace before and after the content. Attribute
 * content defaults to `pre`, since whitespace in an attribute value is
 * usually intentional.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::OptionsError;

/// Regex for matching runs of whitespace
static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Elements whose content is whitespace-significant
const PRESERVING_ELEMENTS: &[&str] = &[
    "textarea",
    "input",
    "select",
    "option",
    "pre",
    "xmp",
    "plaintext",
    "listing",
];

/// Whitespace handling option
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceOption {
    Trim,
    Normal,
    Pre,
    PreLine,
}

impl WhitespaceOption {
    /// The option name, as written in annotations
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::Normal => "normal",
            Self::Pre => "pre",
            Self::PreLine => "pre-line",
        }
    }
}

impl std::fmt::Display for WhitespaceOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WhitespaceOption {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trim" => Ok(Self::Trim),
            "normal" => Ok(Self::Normal),
            "pre" => Ok(Self::Pre),
            "pre-line" => Ok(Self::PreLine),
            _ => Err(OptionsError::InvalidValue {
                name: "whitespace",
                allowed: "'trim', 'normal', 'pre' or 'pre-line'",
                value: s.to_string(),
            }),
        }
    }
}

/// Whitespace policy applied to content read from templates
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentWhitespace;

impl ContentWhitespace {
    /// Gets the default option for an element's content, or for one of its attributes
    pub fn get_default(&self, element_name: &str, attr_name: Option<&str>) -> WhitespaceOption {
        if attr_name.is_some() {
            return WhitespaceOption::Pre;
        }

        if PRESERVING_ELEMENTS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(element_name))
        {
            WhitespaceOption::Pre
        } else {
            WhitespaceOption::Trim
        }
    }

    /// Normalizes the whitespace in `content` according to `option`
    pub fn normalize(&self, content: &str, option: WhitespaceOption) -> String {
        match option {
            WhitespaceOption::Pre => content.to_string(),
            WhitespaceOption::Normal => WHITESPACE_REGEX.replace_all(content, " ").into_owned(),
            WhitespaceOption::Trim => {
                let normal = self.normalize(content, WhitespaceOption::Normal);
                let trimmed = normal.strip_prefix(' ').unwrap_or(&normal);
                trimmed.strip_suffix(' ').unwrap_or(trimmed).to_string()
            }
            WhitespaceOption::PreLine => content
                .split('\n')
                .map(|line| self.normalize(line, WhitespaceOption::Trim))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
