/*!
 * Tests for export and import files
 */

use anyhow::Result;
use translate_html::content_file::{ExportFile, ImportFile, ROOT_SCOPE, prefixed_content_id};
use translate_html::errors::ContentFileError;

use crate::common;

#[test]
fn test_exportFile_parse_shouldReadAllFields() -> Result<()> {
    let json = r#"{
        "abc": {
            "content": "Hello",
            "hint": "greeting",
            "context": ["Shown on the start page"],
            "sources": ["./index.html", "./about.html"]
        },
        "def": { "content": "Bye" }
    }"#;

    let file = ExportFile::parse(json, ".json")?;

    let entry = file.get("abc").unwrap();
    assert_eq!(entry.hint.as_deref(), Some("greeting"));
    assert_eq!(entry.context, vec!["Shown on the start page"]);
    assert_eq!(entry.sources.len(), 2);
    assert!(file.get("def").unwrap().sources.is_empty());
    assert_eq!(file.contents().keys().collect::<Vec<_>>(), vec!["abc", "def"]);

    Ok(())
}

#[test]
fn test_exportFile_parse_withUnsupportedExtension_shouldFail() {
    let error = ExportFile::parse("{}", ".yaml").unwrap_err();

    assert!(matches!(error, ContentFileError::UnsupportedFormat(_)));
    assert_eq!(error.to_string(), "The file format '.yaml' is not supported");
}

#[test]
fn test_importFile_set_shouldOverwriteWithinScope() {
    let mut file = ImportFile::new();
    file.set(ROOT_SCOPE, "a", "first");
    file.set(ROOT_SCOPE, "a", "second");

    assert_eq!(file.get("./x.html", "a"), Some("second"));
    assert_eq!(file.scopes().len(), 1);
}

#[test]
fn test_importFile_stringify_shouldNestByScope() -> Result<()> {
    let mut file = ImportFile::new();
    file.set(ROOT_SCOPE, "a", "A");
    file.set("./admin/", "b", "B");

    let value: serde_json::Value = serde_json::from_str(&file.stringify(".json")?)?;

    assert_eq!(value, serde_json::json!({ "./": { "a": "A" }, "./admin/": { "b": "B" } }));
    Ok(())
}

#[test]
fn test_prefixedContentId_shouldPrefixUnlessRooted() {
    assert_eq!(prefixed_content_id("title", "./i18n/en.json"), "./i18n/en:title");
    assert_eq!(prefixed_content_id("./shared:title", "./i18n/en.json"), "./shared:title");
}

#[test]
fn test_exportFile_load_withInvalidJson_shouldReportPath() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "export.json", "{ not json")?;

    let error = ExportFile::load(&path).unwrap_err();

    assert!(error.to_string().contains("export.json"));
    Ok(())
}
