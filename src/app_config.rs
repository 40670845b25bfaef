use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::content_hash::{ContentHash, HashRegistry};
use crate::file_utils::FileManager;
use crate::html::Document;
use crate::tasks::{ExportTaskConfig, ImportTaskConfig, TranslateTaskConfig};
use crate::template::config::{DEFAULT_ATTRIBUTE_NAME, DEFAULT_ATTRIBUTE_PATTERN};
use crate::template::{TemplateParser, TemplateParserConfig};
use crate::template_language::TemplateLanguageKind;
use crate::translator::ContentTranslator;
use crate::whitespace::ContentWhitespace;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the attribute annotating element content
    #[serde(default = "default_attribute_name")]
    pub attribute_name: String,

    /// Pattern for attributes annotating other attributes, with one `*`
    #[serde(default = "default_attribute_pattern")]
    pub attribute_pattern: String,

    /// Allow attributes matching the pattern to hold their own content
    #[serde(default)]
    pub allow_direct_annotation: bool,

    /// Number of hex characters in computed content ids
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Binding expression syntax used in templates
    #[serde(default)]
    pub template_language: TemplateLanguageKind,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub export: ExportTaskConfig,

    #[serde(default)]
    pub import: ImportTaskConfig,

    #[serde(default)]
    pub translate: TranslateTaskConfig,
}

fn default_attribute_name() -> String {
    DEFAULT_ATTRIBUTE_NAME.to_string()
}

fn default_attribute_pattern() -> String {
    DEFAULT_ATTRIBUTE_PATTERN.to_string()
}

fn default_hash_length() -> usize {
    9
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.parser_config()?;
        ContentHash::new(self.hash_length, HashRegistry::new())?;
        self.export.validate()?;

        Ok(())
    }

    /// Builds the template parser settings
    pub fn parser_config(&self) -> Result<TemplateParserConfig> {
        Ok(TemplateParserConfig::new(
            &self.attribute_name,
            &self.attribute_pattern,
            self.allow_direct_annotation,
        )?)
    }

    /// Creates a template parser recording ids in `registry`
    pub fn template_parser<D: Document>(&self, registry: HashRegistry) -> Result<TemplateParser<D>> {
        let hash = ContentHash::new(self.hash_length, registry)?;

        Ok(TemplateParser::new(
            self.parser_config()?,
            self.template_language.create(),
            ContentWhitespace,
            hash,
        ))
    }

    /// Creates the content translator selected in the translate section
    pub fn content_translator(&self) -> Result<std::sync::Arc<dyn ContentTranslator>> {
        Ok(self
            .translate
            .translator
            .create(self.parser_config()?, self.template_language.create()))
    }

    /// Loads the configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;

        serde_json::from_str(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Loads the configuration, writing a default one if the file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;

        FileManager::write_to_file(path, &config_json)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            attribute_name: default_attribute_name(),
            attribute_pattern: default_attribute_pattern(),
            allow_direct_annotation: false,
            hash_length: default_hash_length(),
            template_language: TemplateLanguageKind::default(),
            log_level: LogLevel::default(),
            export: ExportTaskConfig::default(),
            import: ImportTaskConfig::default(),
            translate: TranslateTaskConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlDocument;

    #[test]
    fn test_load_withPartialFile_shouldApplyDefaults() {
        let config: Config = serde_json::from_str(
            r#"{ "hash_length": 12, "template_language": "aurelia", "import": { "missing_content_handling": "warn" } }"#,
        )
        .unwrap();

        assert_eq!(config.hash_length, 12);
        assert_eq!(config.template_language, TemplateLanguageKind::Aurelia);
        assert_eq!(config.attribute_name, "translate");
        assert_eq!(config.attribute_pattern, "*.translate");
        assert!(config.export.log_suspected_orphans);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_withInvalidValues_shouldFail() {
        let config = Config {
            hash_length: 33,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            attribute_pattern: "translate".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loadOrCreate_shouldWriteDefaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load(&path).unwrap(), created);
    }

    #[test]
    fn test_templateParser_shouldUseConfiguredLanguage() {
        let config = Config {
            template_language: TemplateLanguageKind::Angular,
            ..Config::default()
        };

        let parser = config.template_parser::<HtmlDocument>(HashRegistry::new()).unwrap();
        let template = parser.parse("<p translate>Hi {{ a < b }}</p>").unwrap();

        assert_eq!(template.content(0).unwrap(), "Hi {{ a < b }}");
    }
}
