/*!
 * Tests for the error types
 */

use translate_html::errors::{
    AppError, ConfigError, ContentFileError, ExpressionError, HashError, OptionsError, TemplateError,
};

#[test]
fn test_templateError_fromNestedErrors_shouldWrapThem() {
    let error: TemplateError = HashError::Collision { id: "abc".to_string() }.into();

    assert!(matches!(error, TemplateError::Hash(_)));
    assert!(error.to_string().contains("id collision was detected for id 'abc'"));
}

#[test]
fn test_appError_conversions_shouldPickVariant() {
    let expression: AppError = ExpressionError::UnbalancedBraces { position: 3 }.into();
    assert!(matches!(expression, AppError::Template(TemplateError::Expression(_))));

    let options: AppError = OptionsError::ExpectedValue {
        position: 5,
        value: "hint:".to_string(),
    }
    .into();
    assert!(matches!(options, AppError::Template(TemplateError::Options(_))));

    let config: AppError = ConfigError::HashLength(40).into();
    assert_eq!(
        config.to_string(),
        "Configuration error: The 'hashLength' option must be a number in the range [1, 32], but was 40"
    );

    let file: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(file, AppError::File(message) if message == "gone"));

    let content: AppError = ContentFileError::InvalidPath("x".to_string()).into();
    assert!(matches!(content, AppError::ContentFile(_)));

    let unknown: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(unknown, AppError::Unknown(message) if message == "boom"));
}

#[test]
fn test_contentFileError_missingContent_shouldNameIdAndFile() {
    let error = ContentFileError::MissingContent {
        id: "abc".to_string(),
        file: "./index.html".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "The content for id 'abc' in file './index.html' was not found in the import file"
    );
}
