/*!
 * Parser resolving the annotations in a template into content instances.
 *
 * The tree is walked depth first. Each level receives a `WalkState` from its
 * parent, describing whether it lies inside content that is being extracted
 * and what the nearest explicit annotation said. Annotations that contradict
 * that state are reported as errors, since they would otherwise be silently
 * ignored or extracted twice.
 */

use std::marker::PhantomData;
use std::sync::Arc;

use crate::content_hash::ContentHash;
use crate::errors::TemplateError;
use crate::html::{Document, HtmlDocument, NodeId, NodeKind};
use crate::template_language::TemplateLanguage;
use crate::whitespace::ContentWhitespace;

use super::Template;
use super::annotation::{
    Annotation, AnnotationInfo, AttributeAnnotation, AttributeContent, Content, ElementAnnotation,
    ElementContent,
};
use super::config::TemplateParserConfig;

/// Elements whose content is never walked
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

const NO_IN_NON_TRANSLATABLE: &str =
    "A translate annotation within a non-translatable element can only contain the value '' or 'yes'";
const YES_IN_TRANSLATABLE: &str =
    "A translate annotation within a translatable element can only contain the value 'no'";
const OPTIONS_IN_CONTENT: &str =
    "A translate annotation within translatable content can only contain the value '', 'yes' or 'no'";

/// State passed from an element to its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct WalkState {
    /// True inside content that is extracted as part of an ancestor's content
    extract: bool,
    /// What the nearest explicit annotation said, if there is one
    translate: Option<bool>,
}

impl WalkState {
    fn is_nested(&self) -> bool {
        self.translate.is_some()
    }
}

/// Parses templates into `Template` instances
pub struct TemplateParser<D: Document = HtmlDocument> {
    config: TemplateParserConfig,
    language: Arc<dyn TemplateLanguage>,
    whitespace: ContentWhitespace,
    hash: ContentHash,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> TemplateParser<D> {
    pub fn new(
        config: TemplateParserConfig,
        language: Arc<dyn TemplateLanguage>,
        whitespace: ContentWhitespace,
        hash: ContentHash,
    ) -> Self {
        Self {
            config,
            language,
            whitespace,
            hash,
            _document: PhantomData,
        }
    }

    pub fn config(&self) -> &TemplateParserConfig {
        &self.config
    }

    /// Parses a template, finding every annotation and content instance in it
    pub fn parse(&self, template: &str) -> Result<Template<D>, TemplateError> {
        let mut expressions = Vec::new();
        let standard_html = self.language.to_standard_html(template, &mut expressions)?;
        let document = D::parse(&standard_html);

        let mut walker = Walker {
            config: &self.config,
            document: &document,
            annotations: Vec::new(),
            contents: Vec::new(),
        };
        walker.walk(document.root(), WalkState::default())?;

        let Walker {
            annotations,
            contents,
            ..
        } = walker;

        Ok(Template {
            document,
            expressions,
            annotations,
            contents,
            language: Arc::clone(&self.language),
            whitespace: self.whitespace,
            hash: self.hash.clone(),
        })
    }
}

struct Walker<'a, D: Document> {
    config: &'a TemplateParserConfig,
    document: &'a D,
    annotations: Vec<Annotation>,
    contents: Vec<Content>,
}

impl<D: Document> Walker<'_, D> {
    fn walk(&mut self, node: NodeId, state: WalkState) -> Result<(), TemplateError> {
        let document = self.document;

        let child_state = match document.node_kind(node) {
            Some(NodeKind::Root) => state,
            Some(NodeKind::Element) => {
                let element_name = document.tag_name(node).unwrap_or_default();

                if SKIPPED_ELEMENTS.contains(&element_name) {
                    return Ok(());
                }

                let child_state = self.element_annotation(node, element_name, state)?;

                for attr_name in document.attribute_names(node) {
                    self.attribute_annotation(node, element_name, &attr_name, state)?;
                }

                child_state
            }
            _ => return Ok(()),
        };

        for &child in document.children(node) {
            self.walk(child, child_state)?;
        }

        Ok(())
    }

    fn nesting_error(element_name: &str, message: &str) -> TemplateError {
        TemplateError::InvalidNesting {
            element: element_name.to_string(),
            message: message.to_string(),
        }
    }

    fn push_annotation(&mut self, annotation: Annotation) -> usize {
        self.annotations.push(annotation);
        self.annotations.len() - 1
    }

    /// Handles the element annotation, if any, returning the state for the children
    fn element_annotation(
        &mut self,
        node: NodeId,
        element_name: &str,
        state: WalkState,
    ) -> Result<WalkState, TemplateError> {
        let document = self.document;
        let config = self.config;

        let Some(value) = document.attribute(node, &config.attribute_name) else {
            return Ok(state);
        };

        let info = AnnotationInfo::from_value(
            node,
            element_name,
            &config.attribute_name,
            value,
            state.is_nested(),
            false,
        )?;

        let translate = info.translate;
        let has_options = info.has_options;
        let index = self.push_annotation(Annotation::Element(ElementAnnotation { info }));

        let child_state = if !state.extract {
            if !translate {
                if state.translate == Some(false) {
                    return Err(Self::nesting_error(element_name, NO_IN_NON_TRANSLATABLE));
                }

                WalkState { extract: false, translate: Some(false) }
            } else {
                self.contents.push(Content::Element(ElementContent { annotation: index }));

                WalkState { extract: true, translate: Some(true) }
            }
        } else if !translate {
            if state.translate != Some(true) {
                return Err(Self::nesting_error(element_name, NO_IN_NON_TRANSLATABLE));
            }

            WalkState { extract: true, translate: Some(false) }
        } else if !has_options {
            if state.translate == Some(true) {
                return Err(Self::nesting_error(element_name, YES_IN_TRANSLATABLE));
            }

            WalkState { extract: true, translate: Some(true) }
        } else {
            return Err(Self::nesting_error(element_name, OPTIONS_IN_CONTENT));
        };

        Ok(child_state)
    }

    /// Handles an attribute, if it matches the annotation attribute pattern
    fn attribute_annotation(
        &mut self,
        node: NodeId,
        element_name: &str,
        attr_name: &str,
        state: WalkState,
    ) -> Result<(), TemplateError> {
        let document = self.document;

        let Some(target_name) = self.config.attribute_pattern.target_name(attr_name) else {
            return Ok(());
        };

        let value = document.attribute(node, attr_name).unwrap_or_default();

        if document.attribute(node, &target_name).is_none() {
            return self.direct_annotation(node, element_name, attr_name, target_name, value, state);
        }

        let info = AnnotationInfo::from_value(node, element_name, attr_name, value, state.is_nested(), false)?;
        let translate = info.translate;
        let has_options = info.has_options;

        let index = self.push_annotation(Annotation::Attribute(AttributeAnnotation {
            info,
            content_name: target_name.clone(),
            target_name,
            is_direct: false,
            is_suspected_orphan: false,
        }));

        let is_content = if !state.extract {
            if !translate && state.translate == Some(false) {
                return Err(Self::nesting_error(element_name, NO_IN_NON_TRANSLATABLE));
            }

            translate
        } else if !translate {
            if state.translate != Some(true) {
                return Err(Self::nesting_error(element_name, NO_IN_NON_TRANSLATABLE));
            }

            false
        } else if !has_options {
            if state.translate == Some(true) {
                return Err(Self::nesting_error(element_name, YES_IN_TRANSLATABLE));
            }

            true
        } else {
            return Err(Self::nesting_error(element_name, OPTIONS_IN_CONTENT));
        };

        if is_content {
            self.contents.push(Content::Attribute(AttributeContent { annotation: index }));
        }

        Ok(())
    }

    /// Handles a pattern-matched attribute whose target attribute does not exist
    fn direct_annotation(
        &mut self,
        node: NodeId,
        element_name: &str,
        attr_name: &str,
        target_name: String,
        value: &str,
        state: WalkState,
    ) -> Result<(), TemplateError> {
        if !self.config.allow_direct_annotation {
            return Err(TemplateError::OrphanedAnnotation {
                element: element_name.to_string(),
                attribute: attr_name.to_string(),
            });
        }

        if state.extract && state.translate == Some(true) {
            return Err(Self::nesting_error(element_name, YES_IN_TRANSLATABLE));
        }

        let info = AnnotationInfo::from_value(node, element_name, attr_name, value, state.is_nested(), true)?;

        let index = self.push_annotation(Annotation::Attribute(AttributeAnnotation {
            info,
            target_name,
            content_name: attr_name.to_string(),
            is_direct: true,
            is_suspected_orphan: AttributeAnnotation::looks_like_annotation(value),
        }));

        self.contents.push(Content::Attribute(AttributeContent { annotation: index }));

        Ok(())
    }
}
