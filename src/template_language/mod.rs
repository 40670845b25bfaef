/*!
 * Binding expression handling for template languages.
 *
 * Binding expressions may contain `<`, `>` and other characters that an HTML
 * parser would mangle, so every expression found in a template is moved into
 * an array and replaced by a numbered placeholder before the template is
 * parsed. After the tree has been rewritten, the placeholders are replaced
 * with the original expressions again.
 *
 * - `NullTemplateLanguage`: no binding syntax
 * - `InterpolationTemplateLanguage`: `{{expr}}` bindings
 * - `PrefixTemplateLanguage`: `${expr}` bindings
 */

use std::sync::Arc;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ExpressionError};

pub mod interpolation;
pub mod prefix;

pub use interpolation::InterpolationTemplateLanguage;
pub use prefix::PrefixTemplateLanguage;

/// A template language, able to convert between template HTML and parser-safe standard HTML
pub trait TemplateLanguage: Send + Sync {
    /// Replaces every binding expression in `template` with a placeholder.
    ///
    /// The original expressions are appended to `expressions`, at the index
    /// encoded in their placeholder.
    fn to_standard_html(
        &self,
        template: &str,
        expressions: &mut Vec<String>,
    ) -> Result<String, ExpressionError>;

    /// Replaces every placeholder in `standard_html` with its original expression.
    fn to_template_html(&self, standard_html: &str, expressions: &[String]) -> String;

    /// Regex matching the placeholders produced by this language, if any
    fn placeholder_regex(&self) -> Option<&Regex> {
        None
    }
}

/// Template language that recognizes no binding syntax
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTemplateLanguage;

impl TemplateLanguage for NullTemplateLanguage {
    fn to_standard_html(
        &self,
        template: &str,
        _expressions: &mut Vec<String>,
    ) -> Result<String, ExpressionError> {
        Ok(template.to_string())
    }

    fn to_template_html(&self, standard_html: &str, _expressions: &[String]) -> String {
        standard_html.to_string()
    }
}

/// Names of the supported template languages, as used in configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLanguageKind {
    /// No binding syntax
    #[default]
    None,
    /// `{{expr}}` interpolation
    Angular,
    /// `${expr}` interpolation
    Aurelia,
}

impl TemplateLanguageKind {
    /// Creates the template language implementation for this kind
    pub fn create(self) -> Arc<dyn TemplateLanguage> {
        match self {
            Self::None => Arc::new(NullTemplateLanguage),
            Self::Angular => Arc::new(InterpolationTemplateLanguage),
            Self::Aurelia => Arc::new(PrefixTemplateLanguage),
        }
    }
}

impl std::fmt::Display for TemplateLanguageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Angular => write!(f, "angular"),
            Self::Aurelia => write!(f, "aurelia"),
        }
    }
}

impl std::str::FromStr for TemplateLanguageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "null" => Ok(Self::None),
            "angular" => Ok(Self::Angular),
            "aurelia" => Ok(Self::Aurelia),
            _ => Err(ConfigError::TemplateLanguage(s.to_string())),
        }
    }
}

/// Quote tracking shared by the expression scanners.
///
/// Inside a quoted string, braces and delimiters lose their meaning and a
/// backslash escapes the next character.
#[derive(Debug, Default)]
struct QuoteScanner {
    quote: Option<u8>,
    escape: bool,
}

impl QuoteScanner {
    /// Feeds one byte, returning true if it belongs to a quoted string
    fn feed(&mut self, c: u8) -> bool {
        if let Some(quote) = self.quote {
            if c == b'\\' && !self.escape {
                self.escape = true;
            } else {
                if c == quote && !self.escape {
                    self.quote = None;
                }
                self.escape = false;
            }
            return true;
        }

        if matches!(c, b'"' | b'\'' | b'`') {
            self.quote = Some(c);
            return true;
        }

        false
    }

    fn in_quote(&self) -> bool {
        self.quote.is_some()
    }

    fn in_escape(&self) -> bool {
        self.escape
    }
}

/// Replaces `{{N}}`-style placeholders matched by `regex` with the expression at index N.
///
/// Placeholders referring to a missing index are left as they are.
fn restore_placeholders(regex: &Regex, standard_html: &str, expressions: &[String]) -> String {
    regex
        .replace_all(standard_html, |caps: &Captures| {
            caps.get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(|index| expressions.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullLanguage_withExpressions_shouldLeaveTemplateUnchanged() {
        let language = NullTemplateLanguage;
        let mut expressions = Vec::new();
        let template = "<p>{{ name }} ${ value }</p>";

        let html = language.to_standard_html(template, &mut expressions).unwrap();

        assert_eq!(html, template);
        assert!(expressions.is_empty());
        assert_eq!(language.to_template_html(&html, &expressions), template);
    }

    #[test]
    fn test_kind_fromStr_shouldAcceptKnownNames() {
        assert_eq!("angular".parse::<TemplateLanguageKind>().unwrap(), TemplateLanguageKind::Angular);
        assert_eq!("Aurelia".parse::<TemplateLanguageKind>().unwrap(), TemplateLanguageKind::Aurelia);
        assert_eq!("none".parse::<TemplateLanguageKind>().unwrap(), TemplateLanguageKind::None);
        assert_eq!(
            "handlebars".parse::<TemplateLanguageKind>(),
            Err(ConfigError::TemplateLanguage("handlebars".to_string()))
        );
    }

    #[test]
    fn test_quoteScanner_withEscapedQuote_shouldStayInsideString() {
        let mut scanner = QuoteScanner::default();
        for c in br#""a\"b"#.iter() {
            assert!(scanner.feed(*c));
        }
        assert!(scanner.in_quote());
        assert!(scanner.feed(b'"'));
        assert!(!scanner.in_quote());
        assert!(!scanner.feed(b'x'));
    }
}
