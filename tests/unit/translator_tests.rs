/*!
 * Tests for content translators
 */

use std::sync::Arc;

use translate_html::html::HtmlDocument;
use translate_html::template::TemplateParserConfig;
use translate_html::template_language::{NullTemplateLanguage, TemplateLanguageKind};
use translate_html::translator::{ContentTranslator, PseudoContentTranslator, TranslatorKind};

fn pseudo() -> PseudoContentTranslator {
    PseudoContentTranslator::<HtmlDocument>::new(TemplateParserConfig::default(), Arc::new(NullTemplateLanguage))
}

#[test]
fn test_pseudo_withMarkup_shouldTranslateEachTextNode() {
    let translated = pseudo().translate("Welcome, <b>friend</b>!").unwrap();

    assert_eq!(translated, "[W:e:l:c:o:m:e, ]<b>[f:r:i:e:n:d]</b>[!]");
}

#[test]
fn test_pseudo_withWhitespaceOnly_shouldReturnInput() {
    assert_eq!(pseudo().translate("   ").unwrap(), "   ");
}

#[test]
fn test_pseudo_withExpressions_shouldKeepThem() {
    let translator = TranslatorKind::Pseudo.create(TemplateParserConfig::default(), TemplateLanguageKind::Aurelia.create());

    assert_eq!(translator.translate("Hi ${user.name}").unwrap(), "[H:i ${user.name}]");
}

#[test]
fn test_pseudo_withMalformedExpression_shouldFail() {
    let translator = TranslatorKind::Pseudo.create(TemplateParserConfig::default(), TemplateLanguageKind::Angular.create());

    assert!(translator.translate("Hi {{ 'x }}").is_err());
}

#[test]
fn test_translatorKind_serde_shouldUseLowercaseNames() {
    let kind: TranslatorKind = serde_json::from_str("\"pseudo\"").unwrap();

    assert_eq!(kind, TranslatorKind::Pseudo);
    assert_eq!(serde_json::to_string(&TranslatorKind::None).unwrap(), "\"none\"");
    assert_eq!(kind.to_string(), "pseudo");
}
