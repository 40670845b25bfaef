/*!
 * Annotations and the content instances they mark.
 */

use crate::errors::TemplateError;
use crate::html::{Document, NodeId};
use crate::options::AnnotationOptions;

use super::config::PreserveAnnotations;

/// Name of the standard HTML attribute written by `PreserveAnnotations::Standard`
const STANDARD_ATTRIBUTE_NAME: &str = "translate";

/// The parts shared by every annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInfo {
    /// The annotated element
    pub node: NodeId,

    /// Lowercase tag name of the annotated element
    pub element_name: String,

    /// Name of the annotation attribute
    pub attribute_name: String,

    /// False only if the annotation value is `no`
    pub translate: bool,

    pub options: AnnotationOptions,

    /// True if the value was parsed as a non-empty options string
    pub has_options: bool,

    /// True if an ancestor element carries an explicit annotation
    pub is_nested: bool,
}

impl AnnotationInfo {
    /// Reads an annotation from its attribute value.
    ///
    /// Options are parsed unless the annotation is direct or the value is `yes` or `no`.
    pub(crate) fn from_value(
        node: NodeId,
        element_name: &str,
        attribute_name: &str,
        value: &str,
        is_nested: bool,
        is_direct: bool,
    ) -> Result<Self, TemplateError> {
        let parse_options = !is_direct && value != "yes" && value != "no";

        let options = if parse_options {
            AnnotationOptions::parse(value)?
        } else {
            AnnotationOptions::default()
        };

        Ok(Self {
            node,
            element_name: element_name.to_string(),
            attribute_name: attribute_name.to_string(),
            translate: value != "no",
            options,
            has_options: parse_options && value.chars().any(|c| !c.is_whitespace()),
            is_nested,
        })
    }

    fn normalized_value(&self) -> &'static str {
        if self.translate { "yes" } else { "no" }
    }
}

/// Annotation of an element's content, such as `<p translate>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAnnotation {
    pub info: AnnotationInfo,
}

/// Annotation of an attribute, such as `title.translate` for `title`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAnnotation {
    pub info: AnnotationInfo,

    /// Name of the annotated attribute
    pub target_name: String,

    /// Name of the attribute currently holding the content. For a direct
    /// annotation this is the annotation attribute itself until it is cleaned.
    pub content_name: String,

    /// True if the annotation attribute holds the content itself
    pub is_direct: bool,

    /// True if a direct annotation looks like it was meant as a regular
    /// annotation whose target attribute is missing
    pub is_suspected_orphan: bool,
}

impl AttributeAnnotation {
    /// Returns true if `value` looks like an annotation value rather than content
    pub(crate) fn looks_like_annotation(value: &str) -> bool {
        matches!(value, "" | "yes" | "no") || AnnotationOptions::parse(value).is_ok()
    }
}

/// An annotation found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Element(ElementAnnotation),
    Attribute(AttributeAnnotation),
}

impl Annotation {
    pub fn info(&self) -> &AnnotationInfo {
        match self {
            Self::Element(annotation) => &annotation.info,
            Self::Attribute(annotation) => &annotation.info,
        }
    }

    pub fn options(&self) -> &AnnotationOptions {
        &self.info().options
    }

    pub fn translate(&self) -> bool {
        self.info().translate
    }

    /// True for direct annotations that are probably orphaned regular annotations
    pub fn is_suspected_orphan(&self) -> bool {
        match self {
            Self::Element(_) => false,
            Self::Attribute(annotation) => annotation.is_suspected_orphan,
        }
    }

    /// Rewrites the annotation in `document` according to `mode`
    pub(crate) fn clean<D: Document>(&mut self, document: &mut D, mode: PreserveAnnotations) {
        match self {
            Self::Element(annotation) => clean_element(&annotation.info, document, mode),
            Self::Attribute(annotation) => clean_attribute(annotation, document, mode),
        }
    }
}

fn clean_element<D: Document>(info: &AnnotationInfo, document: &mut D, mode: PreserveAnnotations) {
    match mode {
        PreserveAnnotations::All => {}
        PreserveAnnotations::None => document.remove_attribute(info.node, &info.attribute_name),
        PreserveAnnotations::Standard => {
            document.remove_attribute(info.node, &info.attribute_name);

            if info.is_nested || !info.translate {
                document.set_attribute(info.node, STANDARD_ATTRIBUTE_NAME, info.normalized_value());
            }
        }
        PreserveAnnotations::Normalize => {
            document.set_attribute(info.node, &info.attribute_name, info.normalized_value());
        }
    }
}

fn clean_attribute<D: Document>(
    annotation: &mut AttributeAnnotation,
    document: &mut D,
    mode: PreserveAnnotations,
) {
    let info = &annotation.info;

    if mode == PreserveAnnotations::All {
        return;
    }

    // Direct annotations move their content to the target attribute first.
    if annotation.is_direct && annotation.content_name == info.attribute_name {
        let content = document
            .attribute(info.node, &info.attribute_name)
            .unwrap_or_default()
            .to_string();

        document.set_attribute(info.node, &annotation.target_name, &content);
        annotation.content_name = annotation.target_name.clone();
    }

    match mode {
        PreserveAnnotations::Normalize => {
            document.set_attribute(info.node, &info.attribute_name, info.normalized_value());
        }
        _ => document.remove_attribute(info.node, &info.attribute_name),
    }
}

/// Content of an annotated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementContent {
    /// Index of the annotation in the template
    pub annotation: usize,
}

/// Content of an annotated attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeContent {
    /// Index of the annotation in the template
    pub annotation: usize,
}

/// A content instance found in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Element(ElementContent),
    Attribute(AttributeContent),
}

impl Content {
    /// Index of the annotation marking this content
    pub fn annotation_index(&self) -> usize {
        match self {
            Self::Element(content) => content.annotation,
            Self::Attribute(content) => content.annotation,
        }
    }
}
