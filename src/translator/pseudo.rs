/*!
 * Pseudo-translation.
 *
 * Translatable text is wrapped in brackets, and a colon is inserted between
 * consecutive word characters, so `Hello world` becomes `[H:e:l:l:o w:o:r:l:d]`.
 * The result is longer than the source and still readable, and text that
 * was missed by the export, or that is cut off or concatenated, stands out.
 *
 * Only text in translate scope is changed: the root is in scope, and the
 * nearest annotation on an element switches scope on or off for its
 * children. Annotated attributes are translated as well. Character
 * references and binding expression placeholders are copied unchanged.
 */

use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::TemplateError;
use crate::html::{Document, HtmlDocument, NodeId, NodeKind};
use crate::template::TemplateParserConfig;
use crate::template_language::TemplateLanguage;

use super::ContentTranslator;

/// Elements whose content is never translated
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Translator producing pseudo-translated content
pub struct PseudoContentTranslator<D: Document = HtmlDocument> {
    config: TemplateParserConfig,
    language: Arc<dyn TemplateLanguage>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> PseudoContentTranslator<D> {
    pub fn new(config: TemplateParserConfig, language: Arc<dyn TemplateLanguage>) -> Self {
        Self {
            config,
            language,
            _document: PhantomData,
        }
    }

    /// Pseudo-translates a single piece of text.
    ///
    /// Whitespace-only text is returned unchanged.
    pub fn translate_text(&self, text: &str) -> String {
        if text.chars().all(char::is_whitespace) {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len() * 2 + 2);
        result.push('[');

        let mut last_end = 0;
        if let Some(regex) = self.language.placeholder_regex() {
            for placeholder in regex.find_iter(text) {
                transform_segment(&text[last_end..placeholder.start()], &mut result);
                result.push_str(placeholder.as_str());
                last_end = placeholder.end();
            }
        }
        transform_segment(&text[last_end..], &mut result);

        result.push(']');
        result
    }

    fn walk(&self, document: &mut D, node: NodeId, translate: bool) {
        let mut translate_children = translate;

        match document.node_kind(node) {
            Some(NodeKind::Text) => {
                if translate {
                    let translated = document.text(node).map(|text| self.translate_text(text));
                    if let Some(translated) = translated {
                        document.set_text(node, &translated);
                    }
                }
                return;
            }
            Some(NodeKind::Root) => {}
            Some(NodeKind::Element) => {
                let element_name = document.tag_name(node).unwrap_or_default();
                if SKIPPED_ELEMENTS.contains(&element_name) {
                    return;
                }

                if let Some(value) = document.attribute(node, &self.config.attribute_name) {
                    translate_children = value != "no";
                }

                for attr_name in document.attribute_names(node) {
                    self.translate_attribute(document, node, &attr_name);
                }
            }
            _ => return,
        }

        let children = document.children(node).to_vec();
        for child in children {
            self.walk(document, child, translate_children);
        }
    }

    fn translate_attribute(&self, document: &mut D, node: NodeId, attr_name: &str) {
        let Some(target_name) = self.config.attribute_pattern.target_name(attr_name) else {
            return;
        };

        let annotation_value = document.attribute(node, attr_name).unwrap_or_default();

        // A direct annotation holds its own content.
        let content_name = match document.attribute(node, &target_name) {
            None => attr_name,
            Some(_) if annotation_value != "no" => target_name.as_str(),
            Some(_) => return,
        };

        let translated = document
            .attribute(node, content_name)
            .map(|value| self.translate_text(value));

        if let Some(translated) = translated {
            document.set_attribute(node, content_name, &translated);
        }
    }
}

impl<D: Document> ContentTranslator for PseudoContentTranslator<D> {
    fn translate(&self, template_html: &str) -> Result<String, TemplateError> {
        let mut expressions = Vec::new();
        let standard_html = self.language.to_standard_html(template_html, &mut expressions)?;

        let mut document = D::parse(&standard_html);
        let root = document.root();
        self.walk(&mut document, root, true);

        Ok(self.language.to_template_html(&document.to_html(), &expressions))
    }
}

impl<D: Document> std::fmt::Debug for PseudoContentTranslator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PseudoContentTranslator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Inserts colons between word characters, leaving character references intact
fn transform_segment(text: &str, out: &mut String) {
    let mut in_reference = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '&' => in_reference = true,
            ' ' | ';' => in_reference = false,
            _ => {}
        }

        out.push(c);

        if !in_reference && is_word_char(c) && chars.peek().is_some_and(|&next| is_word_char(next)) {
            out.push(':');
        }
    }
}
