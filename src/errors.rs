/*!
 * Error types for the translate-html library.
 *
 * Each stage of template processing has its own error enum, defined with
 * the thiserror crate. `TemplateError` wraps everything that can go wrong
 * while parsing or rewriting a single template, and `AppError` wraps the
 * errors surfaced by the tasks and the command line tool.
 */

use thiserror::Error;

/// Errors raised while extracting binding expressions from a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// A quoted string inside an expression was never closed
    #[error("Unbalanced quotes in expression starting at position {position}")]
    UnbalancedQuotes {
        /// Byte offset of the expression start
        position: usize,
    },

    /// Braces inside an expression do not balance
    #[error("Unbalanced braces in expression starting at position {position}")]
    UnbalancedBraces {
        /// Byte offset of the expression start
        position: usize,
    },

    /// The template ended right after an escape character
    #[error("Expected character after escape at position {position}")]
    TrailingEscape {
        /// Byte offset of the escape character
        position: usize,
    },
}

/// Errors raised while parsing an options string in an annotation attribute
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// No valid option name at the given position
    #[error("Expected property name at position {position} in attribute value '{value}'")]
    ExpectedName { position: usize, value: String },

    /// A character other than the expected one was found
    #[error("Expected '{expected}' at position {position} in attribute value '{value}'")]
    ExpectedCharacter {
        expected: char,
        position: usize,
        value: String,
    },

    /// The option has no value
    #[error("Expected property value at position {position} in attribute value '{value}'")]
    ExpectedValue { position: usize, value: String },

    /// The value ended with a dangling escape character
    #[error("Expected character after escape at position {position} in attribute value '{value}'")]
    TrailingEscape { position: usize, value: String },

    /// An option has a value outside its allowed set
    #[error("The '{name}' option must be {allowed}, but was '{value}'")]
    InvalidValue {
        name: &'static str,
        allowed: &'static str,
        value: String,
    },
}

/// Errors raised by the content identity registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Two different contents were assigned the same id
    #[error("An id collision was detected for id '{id}'. The id is associated with multiple different content instances. You may need to increase the hash length.")]
    Collision {
        /// The colliding id
        id: String,
    },
}

/// Errors raised for unsupported configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Hash length outside [1, 32]
    #[error("The 'hashLength' option must be a number in the range [1, 32], but was {0}")]
    HashLength(usize),

    /// Attribute pattern without exactly one '*' and a prefix or suffix
    #[error("The '{option}' option must contain a prefix and/or postfix and exactly one '*', but was '{pattern}'")]
    AttributePattern { option: &'static str, pattern: String },

    /// Unknown template language name
    #[error("The template language '{0}' is not supported")]
    TemplateLanguage(String),

    /// Unknown content translator name
    #[error("The content translator '{0}' is not supported")]
    ContentTranslator(String),

    /// Unknown annotation preservation mode
    #[error("The annotations option must be 'none', 'standard', 'normalize' or 'all', but was '{0}'")]
    PreserveAnnotations(String),

    /// Unknown missing content handling mode
    #[error("The missing content option must be 'error', 'warn' or 'ignore', but was '{0}'")]
    MissingContent(String),

    /// Replacement template without exactly one '*'
    #[error("The 'replaceWithIds' option must contain exactly one '*', but was '{0}'")]
    ReplaceWithIds(String),

    /// Annotation attribute name is empty
    #[error("The 'attributeName' option must not be empty")]
    AttributeName,
}

/// Errors raised while parsing, rewriting or translating a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Malformed binding expression
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Malformed annotation options
    #[error("Options error: {0}")]
    Options(#[from] OptionsError),

    /// Id collision
    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    /// An annotation contradicts the annotation of an ancestor element
    #[error("Invalid annotation on <{element}>: {message}")]
    InvalidNesting {
        /// Tag name of the annotated element
        element: String,
        /// What was wrong
        message: String,
    },

    /// A pattern-matched annotation attribute without target attribute
    #[error("An orphaned translate annotation '{attribute}' was found on <{element}>")]
    OrphanedAnnotation { element: String, attribute: String },

    /// A content index that does not exist in the template
    #[error("No content instance at index {0}")]
    UnknownContent(usize),
}

/// Errors raised while reading or writing export and import files
#[derive(Error, Debug)]
pub enum ContentFileError {
    /// File name extension without a supported format
    #[error("The file format '{0}' is not supported")]
    UnsupportedFormat(String),

    /// The file contents are not valid JSON of the expected shape
    #[error("Failed to parse content file: {0}")]
    Json(#[from] serde_json::Error),

    /// A source or scope path that is not relative to the base path
    #[error("Invalid path '{0}'. Expected a string that begins with './'")]
    InvalidPath(String),

    /// Content for an id is missing from all import files
    #[error("The content for id '{id}' in file '{file}' was not found in the import file")]
    MissingContent { id: String, file: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from template processing
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Error from an export or import file
    #[error("Content file error: {0}")]
    ContentFile(#[from] ContentFileError),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<ExpressionError> for AppError {
    fn from(error: ExpressionError) -> Self {
        Self::Template(error.into())
    }
}

impl From<OptionsError> for AppError {
    fn from(error: OptionsError) -> Self {
        Self::Template(error.into())
    }
}
