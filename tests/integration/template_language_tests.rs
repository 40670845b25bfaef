/*!
 * Tests for templates containing binding expressions
 */

use anyhow::Result;
use std::path::Path;

use translate_html::content_file::ImportFile;
use translate_html::tasks::{ImportTask, ImportTaskConfig, TemplateTask};
use translate_html::template::{PreserveAnnotations, TemplateParserConfig};
use translate_html::template_language::TemplateLanguageKind;
use translate_html::translator::{ContentTranslator, TranslatorKind};

use crate::common;

const ANGULAR_TEMPLATE: &str = r#"<p translate>Hello {{ user.name | upper }}</p><input placeholder="Search" placeholder.translate value="{{ q }}">"#;

#[test]
fn test_angular_shouldProtectExpressionsInContentAndAttributes() -> Result<()> {
    let parser = common::create_parser(TemplateLanguageKind::Angular);

    let template = parser.parse(ANGULAR_TEMPLATE)?;

    assert_eq!(template.expressions().len(), 2);
    assert_eq!(template.content(0)?, "Hello {{ user.name | upper }}");
    assert_eq!(template.content(1)?, "Search");
    assert_eq!(template.to_html(), ANGULAR_TEMPLATE);
    Ok(())
}

#[test]
fn test_angular_importOfPseudoTranslation_shouldKeepExpressions() -> Result<()> {
    let parser = common::create_parser(TemplateLanguageKind::Angular);
    let translator = TranslatorKind::Pseudo.create(TemplateParserConfig::default(), TemplateLanguageKind::Angular.create());

    let template = parser.parse(ANGULAR_TEMPLATE)?;
    let mut import_file = ImportFile::new();
    for index in 0..template.contents().len() {
        let translated = translator.translate(&template.content(index)?)?;
        import_file.set("./", &template.content_id(index)?, &translated);
    }

    let config = ImportTaskConfig {
        preserve_annotations: PreserveAnnotations::None,
        ..ImportTaskConfig::default()
    };
    let mut task = ImportTask::with_import_files(config, common::create_parser(TemplateLanguageKind::Angular), vec![import_file]);

    let output = task.process(Path::new("page.html"), ANGULAR_TEMPLATE)?;

    assert_eq!(
        output,
        r#"<p>[H:e:l:l:o {{ user.name | upper }}]</p><input placeholder="[S:e:a:r:c:h]" value="{{ q }}">"#
    );
    Ok(())
}

#[test]
fn test_aurelia_shouldProtectPrefixedExpressions() -> Result<()> {
    let parser = common::create_parser(TemplateLanguageKind::Aurelia);

    let mut template = parser.parse(r#"<p translate>Total: ${price > 0 ? price : "free"}</p>"#)?;
    assert_eq!(template.content(0)?, r#"Total: ${price > 0 ? price : "free"}"#);

    template.set_content(0, "Gesamt: ${total}")?;
    template.clean(PreserveAnnotations::None);

    assert_eq!(template.to_html(), "<p>Gesamt: ${total}</p>");
    Ok(())
}

#[test]
fn test_angular_withUnbalancedExpression_shouldFailToParse() {
    let parser = common::create_parser(TemplateLanguageKind::Angular);

    assert!(parser.parse("<p translate>{{ a </p>").is_err());
}
