/*!
 * Content translators.
 *
 * A translator turns exported content into translated content. Two
 * implementations are available:
 * - Null: returns the content unchanged
 * - Pseudo: produces pseudo-translated content, which makes text that was
 *   not exported, or that is cut off or concatenated, easy to spot
 */

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, TemplateError};
use crate::html::HtmlDocument;
use crate::template::TemplateParserConfig;
use crate::template_language::TemplateLanguage;

pub mod pseudo;

pub use pseudo::PseudoContentTranslator;

/// Common trait for all content translators
pub trait ContentTranslator: Send + Sync + Debug {
    /// Translate the specified content
    ///
    /// # Arguments
    /// * `template_html` - The content to translate, which may contain markup and binding expressions
    ///
    /// # Returns
    /// * `Result<String, TemplateError>` - The translated content, or an error if its expressions are malformed
    fn translate(&self, template_html: &str) -> Result<String, TemplateError>;
}

/// Translator returning content unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct NullContentTranslator;

impl ContentTranslator for NullContentTranslator {
    fn translate(&self, template_html: &str) -> Result<String, TemplateError> {
        Ok(template_html.to_string())
    }
}

/// Names of the supported translators, as used in configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    #[default]
    None,
    Pseudo,
}

impl TranslatorKind {
    /// Creates the translator for this kind
    pub fn create(
        self,
        config: TemplateParserConfig,
        language: Arc<dyn TemplateLanguage>,
    ) -> Arc<dyn ContentTranslator> {
        match self {
            Self::None => Arc::new(NullContentTranslator),
            Self::Pseudo => Arc::new(PseudoContentTranslator::<HtmlDocument>::new(config, language)),
        }
    }
}

impl std::fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pseudo => write!(f, "pseudo"),
        }
    }
}

impl std::str::FromStr for TranslatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "null" => Ok(Self::None),
            "pseudo" => Ok(Self::Pseudo),
            _ => Err(ConfigError::ContentTranslator(s.to_string())),
        }
    }
}
