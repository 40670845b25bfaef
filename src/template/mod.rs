/*!
 * Annotated templates.
 *
 * A template marks localizable content with annotations:
 *
 * - `<p translate>Hello</p>` marks the content of an element.
 * - `<img alt="Logo" alt.translate>` marks the value of another attribute,
 *   selected through the attribute pattern.
 * - `<p translate="hint: greeting; context: Shown on the start page">` adds
 *   options to an annotation.
 * - `<p translate="no">` excludes the content of an element, for example
 *   inside other translatable content.
 *
 * `TemplateParser` resolves the annotations into content instances, which
 * can then be read, replaced and identified through the returned `Template`.
 */

use std::sync::Arc;

use crate::content_hash::ContentHash;
use crate::errors::TemplateError;
use crate::html::{Document, HtmlDocument};
use crate::template_language::TemplateLanguage;
use crate::whitespace::ContentWhitespace;

pub mod annotation;
pub mod config;
pub mod parser;

pub use annotation::{
    Annotation, AnnotationInfo, AttributeAnnotation, AttributeContent, Content, ElementAnnotation,
    ElementContent,
};
pub use config::{AttributePattern, PreserveAnnotations, TemplateParserConfig};
pub use parser::TemplateParser;

/// A parsed template, holding its content instances and annotations
pub struct Template<D: Document = HtmlDocument> {
    document: D,
    expressions: Vec<String>,
    annotations: Vec<Annotation>,
    contents: Vec<Content>,
    language: Arc<dyn TemplateLanguage>,
    whitespace: ContentWhitespace,
    hash: ContentHash,
}

impl<D: Document> Template<D> {
    /// The content instances, in document order
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Every annotation found in the template, including those not marking content
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The binding expressions found in the template
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// The parsed document, with expressions replaced by placeholders
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The annotation marking the content instance at `index`
    pub fn content_annotation(&self, index: usize) -> Result<&Annotation, TemplateError> {
        let content = self.contents.get(index).ok_or(TemplateError::UnknownContent(index))?;

        self.annotations
            .get(content.annotation_index())
            .ok_or(TemplateError::UnknownContent(index))
    }

    /// Reads the content instance at `index`, with whitespace normalized and expressions restored
    pub fn content(&self, index: usize) -> Result<String, TemplateError> {
        let html = match self.content_annotation(index)? {
            Annotation::Element(annotation) => {
                let info = &annotation.info;
                let option = info
                    .options
                    .whitespace
                    .unwrap_or_else(|| self.whitespace.get_default(&info.element_name, None));
                let html = self.document.inner_html(info.node);

                self.whitespace.normalize(&html, option)
            }
            Annotation::Attribute(annotation) => {
                let info = &annotation.info;
                let option = info.options.whitespace.unwrap_or_else(|| {
                    self.whitespace
                        .get_default(&info.element_name, Some(&annotation.target_name))
                });
                let value = self
                    .document
                    .attribute(info.node, &annotation.content_name)
                    .unwrap_or_default();

                self.whitespace.normalize(value, option)
            }
        };

        Ok(self.language.to_template_html(&html, &self.expressions))
    }

    /// Replaces the content instance at `index` with `content`.
    ///
    /// Expressions in `content` are added to the template. Quotes in attribute
    /// content are encoded as character references.
    pub fn set_content(&mut self, index: usize, content: &str) -> Result<(), TemplateError> {
        let annotation = self
            .contents
            .get(index)
            .and_then(|c| self.annotations.get(c.annotation_index()))
            .ok_or(TemplateError::UnknownContent(index))?;

        let standard_html = self
            .language
            .to_standard_html(content, &mut self.expressions)?;

        match annotation {
            Annotation::Element(annotation) => {
                self.document.set_inner_html(annotation.info.node, &standard_html);
            }
            Annotation::Attribute(annotation) => {
                let value = standard_html.replace('"', "&quot;").replace('\'', "&apos;");
                self.document
                    .set_attribute(annotation.info.node, &annotation.content_name, &value);
            }
        }

        Ok(())
    }

    /// Gets the id of the content instance at `index`.
    ///
    /// This is the `id` option if specified, and otherwise the hash of the
    /// content and hint. Both are checked for collisions with previously
    /// identified content.
    pub fn content_id(&self, index: usize) -> Result<String, TemplateError> {
        let content = self.content(index)?;
        let options = self.content_annotation(index)?.options();
        let hint = options.hint.as_deref();

        match &options.id {
            Some(id) => {
                self.hash.register_id(id, &content, hint)?;
                Ok(id.clone())
            }
            None => Ok(self.hash.compute(&content, hint)?),
        }
    }

    /// Rewrites every annotation according to `mode`
    pub fn clean(&mut self, mode: PreserveAnnotations) {
        for annotation in &mut self.annotations {
            annotation.clean(&mut self.document, mode);
        }
    }

    /// Serializes the template, with expressions restored
    pub fn to_html(&self) -> String {
        self.language
            .to_template_html(&self.document.to_html(), &self.expressions)
    }
}

impl<D: Document> std::fmt::Display for Template<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl<D: Document> std::fmt::Debug for Template<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("expressions", &self.expressions)
            .field("annotations", &self.annotations)
            .field("contents", &self.contents)
            .finish_non_exhaustive()
    }
}
