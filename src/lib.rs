/*!
 * # translate-html
 *
 * A Rust library for localizing HTML templates through annotations.
 *
 * ## Features
 *
 * - Mark localizable content with `translate` and `*.translate` annotations
 * - Extract content with stable, hash based ids and collision detection
 * - Keep binding expressions such as `{{ name }}` and `${name}` intact
 * - Normalize whitespace per element or per annotation
 * - Pseudo-translate exported content to test localization
 * - Write translated content back into templates, cleaning annotations
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `template_language`: Binding expression extraction and restoration
 * - `html`: The `Document` tree trait and its lossless HTML implementation
 * - `template`: Annotation parsing, content access and cleaning
 * - `content_hash`: Content ids and collision detection
 * - `whitespace`: Whitespace normalization policies
 * - `options`: The annotation options mini-language
 * - `translator`: Content translators, including the pseudo translator
 * - `content_file`: Export and import files
 * - `tasks`: The export, import and translate tasks
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod content_file;
pub mod content_hash;
pub mod errors;
pub mod file_utils;
pub mod html;
pub mod options;
pub mod tasks;
pub mod template;
pub mod template_language;
pub mod translator;
pub mod whitespace;

// Re-export main types for easier usage
pub use app_config::Config;
pub use content_file::{ExportFile, ImportFile};
pub use content_hash::{ContentHash, HashRegistry};
pub use errors::{AppError, ConfigError, ContentFileError, TemplateError};
pub use html::{Document, HtmlDocument};
pub use options::AnnotationOptions;
pub use tasks::{ExportTask, ImportTask, TemplateTask, TranslateTask};
pub use template::{PreserveAnnotations, Template, TemplateParser, TemplateParserConfig};
pub use template_language::{TemplateLanguage, TemplateLanguageKind};
pub use translator::{ContentTranslator, PseudoContentTranslator, TranslatorKind};
pub use whitespace::{ContentWhitespace, WhitespaceOption};
