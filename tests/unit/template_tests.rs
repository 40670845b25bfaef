/*!
 * Tests for template parsing, content access and annotation cleaning
 */

use translate_html::content_hash::{ContentHash, HashRegistry};
use translate_html::errors::{HashError, TemplateError};
use translate_html::template::{Annotation, PreserveAnnotations, TemplateParserConfig};
use translate_html::template_language::TemplateLanguageKind;

use crate::common;

#[test]
fn test_parse_withSampleTemplate_shouldFindAllContents() {
    let parser = common::create_parser(TemplateLanguageKind::None);

    let template = parser.parse(common::SAMPLE_TEMPLATE).unwrap();

    assert_eq!(template.contents().len(), 3);
    assert_eq!(template.content(0).unwrap(), "Hello world");
    assert_eq!(template.content(1).unwrap(), "Welcome, <b>friend</b>!");
    assert_eq!(template.content(2).unwrap(), "Logo");
    assert!(matches!(template.content_annotation(2).unwrap(), Annotation::Attribute(_)));
}

#[test]
fn test_parse_withExcludedChild_shouldKeepItInParentContent() {
    let parser = common::create_parser(TemplateLanguageKind::None);

    let template = parser
        .parse(r#"<div translate><span translate="no">x</span> y</div>"#)
        .unwrap();

    assert_eq!(template.contents().len(), 1);
    assert_eq!(template.annotations().len(), 2);
    assert_eq!(template.content(0).unwrap(), r#"<span translate="no">x</span> y"#);
}

#[test]
fn test_parse_withNoInsideNo_shouldFail() {
    let parser = common::create_parser(TemplateLanguageKind::None);

    let result = parser.parse(r#"<div translate="no"><p translate="no">x</p></div>"#);

    assert!(matches!(result, Err(TemplateError::InvalidNesting { .. })));
}

#[test]
fn test_parse_withOrphanedAnnotation_shouldFailUnlessDirectAllowed() {
    let template = r#"<span title.translate>Hi</span>"#;

    let strict = common::create_parser(TemplateLanguageKind::None);
    assert!(matches!(
        strict.parse(template),
        Err(TemplateError::OrphanedAnnotation { .. })
    ));

    let config = TemplateParserConfig {
        allow_direct_annotation: true,
        ..TemplateParserConfig::default()
    };
    let lenient = common::create_parser_with(TemplateLanguageKind::None, config, HashRegistry::new());
    let parsed = lenient.parse(template).unwrap();

    assert_eq!(parsed.contents().len(), 1);
    assert!(parsed.content_annotation(0).unwrap().is_suspected_orphan());
}

#[test]
fn test_contentId_shouldTruncateDigestOfContentAndHint() {
    let parser = common::create_parser(TemplateLanguageKind::None);
    let template = parser.parse(common::SAMPLE_TEMPLATE).unwrap();

    let id = template.content_id(0).unwrap();
    let hinted = template.content_id(1).unwrap();

    assert_eq!(id, &ContentHash::digest("Hello world", None)[..9]);
    assert_eq!(hinted, &ContentHash::digest("Welcome, <b>friend</b>!", Some("intro"))[..9]);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_contentId_withSharedRegistry_shouldDetectExplicitIdCollision() {
    let registry = HashRegistry::new();
    let parser = common::create_parser_with(
        TemplateLanguageKind::None,
        TemplateParserConfig::default(),
        registry.clone(),
    );

    let first = parser.parse(r#"<p translate="id: title">Home</p>"#).unwrap();
    let second = parser.parse(r#"<p translate="id: title">About</p>"#).unwrap();

    assert_eq!(first.content_id(0).unwrap(), "title");
    assert!(matches!(
        second.content_id(0),
        Err(TemplateError::Hash(HashError::Collision { id })) if id == "title"
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_setContent_shouldReplaceElementAndAttributeContent() {
    let parser = common::create_parser(TemplateLanguageKind::None);
    let mut template = parser.parse(common::SAMPLE_TEMPLATE).unwrap();

    template.set_content(0, "Bonjour <i>monde</i>").unwrap();
    template.set_content(2, r#"Say "hi""#).unwrap();

    assert_eq!(template.content(0).unwrap(), "Bonjour <i>monde</i>");
    assert!(template.to_html().contains(r#"alt="Say &quot;hi&quot;" alt.translate"#));
    assert!(matches!(template.set_content(7, "x"), Err(TemplateError::UnknownContent(7))));
}

#[test]
fn test_clean_withEachMode_shouldRewriteAnnotations() {
    let parser = common::create_parser(TemplateLanguageKind::None);
    let source = r#"<div translate="hint: foo">a <span translate="no">b</span></div>"#;

    let cleaned = |mode: PreserveAnnotations| {
        let mut template = parser.parse(source).unwrap();
        template.clean(mode);
        template.to_html()
    };

    assert_eq!(cleaned(PreserveAnnotations::None), "<div>a <span>b</span></div>");
    assert_eq!(
        cleaned(PreserveAnnotations::Standard),
        r#"<div>a <span translate="no">b</span></div>"#
    );
    assert_eq!(
        cleaned(PreserveAnnotations::Normalize),
        r#"<div translate="yes">a <span translate="no">b</span></div>"#
    );
    assert_eq!(cleaned(PreserveAnnotations::All), source);
}

#[test]
fn test_toHtml_withoutChanges_shouldReproduceTemplate() {
    let parser = common::create_parser(TemplateLanguageKind::None);
    let source = "<!DOCTYPE html>\n<html><body class='x'><!-- note --><p translate>A &amp; B</p><br/></body></html>";

    let template = parser.parse(source).unwrap();

    assert_eq!(template.to_html(), source);
    assert_eq!(template.content(0).unwrap(), "A &amp; B");
}
