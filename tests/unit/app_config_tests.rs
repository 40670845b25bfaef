/*!
 * Tests for the application configuration
 */

use anyhow::Result;
use translate_html::app_config::{Config, LogLevel};
use translate_html::html::HtmlDocument;
use translate_html::content_hash::HashRegistry;
use translate_html::tasks::MissingContentHandling;
use translate_html::template::PreserveAnnotations;
use translate_html::template_language::TemplateLanguageKind;
use translate_html::translator::TranslatorKind;

use crate::common;

#[test]
fn test_default_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.attribute_name, "translate");
    assert_eq!(config.attribute_pattern, "*.translate");
    assert!(!config.allow_direct_annotation);
    assert_eq!(config.hash_length, 9);
    assert_eq!(config.template_language, TemplateLanguageKind::None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.export.preserve_annotations, PreserveAnnotations::None);
    assert_eq!(config.import.missing_content_handling, MissingContentHandling::Error);
    assert_eq!(config.translate.translator, TranslatorKind::None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_withSections_shouldParseTaskSettings() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "attribute_pattern": "data-*-i18n",
            "allow_direct_annotation": true,
            "export": { "replace_with_ids": "{{*}}", "preserve_annotations": "standard" },
            "translate": { "translator": "pseudo" },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.export.replace_with_ids.as_deref(), Some("{{*}}"));
    assert_eq!(config.export.preserve_annotations, PreserveAnnotations::Standard);
    assert_eq!(config.translate.translator, TranslatorKind::Pseudo);
    assert_eq!(config.log_level, LogLevel::Debug);
    config.validate()?;

    let parser_config = config.parser_config()?;
    assert_eq!(parser_config.attribute_pattern.target_name("data-title-i18n").as_deref(), Some("title"));
    Ok(())
}

#[test]
fn test_validate_withBadReplacement_shouldFail() {
    let mut config = Config::default();
    config.export.replace_with_ids = Some("no star".to_string());

    let error = config.validate().unwrap_err();

    assert!(error.to_string().contains("replaceWithIds"));
}

#[test]
fn test_templateParser_withCustomAttributeName_shouldUseIt() -> Result<()> {
    let config = Config {
        attribute_name: "i18n".to_string(),
        ..Config::default()
    };

    let parser = config.template_parser::<HtmlDocument>(HashRegistry::new())?;
    let template = parser.parse(r#"<p i18n>Hi</p><p translate>Ignored</p>"#)?;

    assert_eq!(template.contents().len(), 1);
    assert_eq!(template.content(0)?, "Hi");
    Ok(())
}

#[test]
fn test_logLevel_shouldConvertToLevelFilter() {
    assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
}
