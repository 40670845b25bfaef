/*!
 * Common test utilities for the translate-html test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use translate_html::content_hash::{ContentHash, HashRegistry};
use translate_html::template::{TemplateParser, TemplateParserConfig};
use translate_html::template_language::TemplateLanguageKind;
use translate_html::whitespace::ContentWhitespace;

/// Template exercising element, attribute and nested annotations
pub const SAMPLE_TEMPLATE: &str = r#"<h1 translate>Hello world</h1>
<p translate="hint: intro">Welcome, <b>friend</b>!</p>
<img src="a.png" alt="Logo" alt.translate>
"#;

/// Routes log output to the test harness, ignoring repeated initialization
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a parser with default settings for the given template language
pub fn create_parser(language: TemplateLanguageKind) -> TemplateParser {
    create_parser_with(language, TemplateParserConfig::default(), HashRegistry::new())
}

/// Creates a parser with custom settings and registry
pub fn create_parser_with(
    language: TemplateLanguageKind,
    config: TemplateParserConfig,
    registry: HashRegistry,
) -> TemplateParser {
    let hash = ContentHash::new(9, registry).expect("valid hash length");

    TemplateParser::new(config, language.create(), ContentWhitespace, hash)
}
