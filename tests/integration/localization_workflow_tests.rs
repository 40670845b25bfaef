/*!
 * End-to-end tests running the export, translate and import tasks on files
 */

use anyhow::Result;
use std::path::Path;

use translate_html::app_config::Config;
use translate_html::content_file::{ExportFile, ImportFile};
use translate_html::content_hash::HashRegistry;
use translate_html::html::HtmlDocument;
use translate_html::tasks::{
    ExportTask, ExportTaskConfig, ImportTask, ImportTaskConfig, MissingContentHandling, TaskOutput,
    TranslateTask, run_task,
};
use translate_html::translator::TranslatorKind;

use crate::common;

const PSEUDO_SAMPLE: &str = r#"<h1>[H:e:l:l:o w:o:r:l:d]</h1>
<p>[W:e:l:c:o:m:e, ]<b>[f:r:i:e:n:d]</b>[!]</p>
<img src="a.png" alt="[L:o:g:o]">
"#;

fn export(config: &Config, site: &Path, export_path: &Path) -> Result<ExportFile> {
    let task_config = ExportTaskConfig {
        export_file_path: Some(export_path.to_path_buf()),
        base_file_path: Some(site.to_path_buf()),
        ..config.export.clone()
    };
    let files = [site.join("index.html")];

    let mut task = ExportTask::new(task_config, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    run_task(&mut task, &files, TaskOutput::Discard)?;

    ExportFile::load(export_path)
}

#[test]
fn test_workflow_withPseudoTranslation_shouldLocalizeTemplate() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let site = dir.path().join("site");
    let dist = dir.path().join("dist");
    common::create_test_file(&site, "index.html", common::SAMPLE_TEMPLATE)?;

    let mut config = Config::default();
    config.translate.translator = TranslatorKind::Pseudo;

    // Export
    let export_path = dir.path().join("export.json");
    let export_file = export(&config, &site, &export_path)?;
    assert_eq!(export_file.len(), 3);
    assert!(export_file.contents().values().all(|c| c.sources == vec!["./index.html"]));

    // Translate
    let import_path = dir.path().join("import.json");
    let translate = TranslateTask::new(config.translate.clone(), config.content_translator()?);
    translate.run(&export_path, &import_path)?;

    // Import
    let import_config = ImportTaskConfig {
        import_file_paths: vec![import_path],
        base_file_path: Some(site.clone()),
        ..config.import.clone()
    };
    let mut task = ImportTask::new(import_config, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    let files = [site.join("index.html")];
    run_task(&mut task, &files, TaskOutput::Directory { base: &site, dir: &dist })?;

    let localized = std::fs::read_to_string(dist.join("index.html"))?;
    assert_eq!(localized, PSEUDO_SAMPLE);
    Ok(())
}

#[test]
fn test_workflow_withScopedImportFile_shouldPreferFolderScope() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let site = dir.path().join("site");
    common::create_test_file(&site, "index.html", r#"<p translate="id: title">Home</p>"#)?;
    common::create_test_file(&site, "admin/index.html", r#"<p translate="id: title">Home</p>"#)?;
    let import_path = common::create_test_file(
        dir.path(),
        "import.json",
        r#"{ "./": { "title": "Accueil" }, "./admin/": { "title": "Administration" } }"#,
    )?;

    let config = Config::default();
    let import_config = ImportTaskConfig {
        import_file_paths: vec![import_path],
        base_file_path: Some(site.clone()),
        ..ImportTaskConfig::default()
    };
    let mut task = ImportTask::new(import_config, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    let files = [site.join("index.html"), site.join("admin").join("index.html")];
    run_task(&mut task, &files, TaskOutput::InPlace)?;

    assert_eq!(std::fs::read_to_string(&files[0])?, "<p>Accueil</p>");
    assert_eq!(std::fs::read_to_string(&files[1])?, "<p>Administration</p>");
    Ok(())
}

#[test]
fn test_workflow_withMissingContent_shouldReportFileUnlessIgnored() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let site = dir.path().join("site");
    let file = common::create_test_file(&site, "index.html", "<p translate>Untranslated</p>")?;

    let mut empty = ImportFile::new();
    empty.set("./", "other", "Autre");
    let import_path = dir.path().join("import.json");
    empty.save(&import_path)?;

    let config = Config::default();
    let import_config = ImportTaskConfig {
        import_file_paths: vec![import_path],
        base_file_path: Some(site.clone()),
        ..ImportTaskConfig::default()
    };

    let mut task = ImportTask::new(import_config.clone(), config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    let error = run_task(&mut task, &[&file], TaskOutput::Discard).unwrap_err();
    assert!(format!("{:#}", error).contains("Error while processing file"));
    assert!(format!("{:#}", error).contains("was not found in the import file"));

    let ignoring = ImportTaskConfig {
        missing_content_handling: MissingContentHandling::Ignore,
        ..import_config
    };
    let mut task = ImportTask::new(ignoring, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    run_task(&mut task, &[&file], TaskOutput::InPlace)?;

    assert_eq!(std::fs::read_to_string(&file)?, "<p>Untranslated</p>");
    Ok(())
}

#[test]
fn test_export_withCollisionAcrossFiles_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let site = dir.path().join("site");
    let first = common::create_test_file(&site, "a.html", r#"<p translate="id: dup">One</p>"#)?;
    let second = common::create_test_file(&site, "b.html", r#"<p translate="id: dup">Two</p>"#)?;

    let config = Config::default();
    let mut task = ExportTask::new(
        ExportTaskConfig::default(),
        config.template_parser::<HtmlDocument>(HashRegistry::new())?,
    )?;

    let error = run_task(&mut task, &[&first, &second], TaskOutput::Discard).unwrap_err();

    assert!(format!("{:#}", error).contains("b.html"));
    assert!(format!("{:#}", error).contains("collision"));
    Ok(())
}

#[test]
fn test_workflow_withContentFile_shouldExportAndImportPrefixedIds() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let site = dir.path().join("site");
    let strings = common::create_test_file(&site, "i18n/strings.json", r#"{ "title": "Home", "save": "Save" }"#)?;
    let export_path = dir.path().join("export.json");

    let config = Config::default();
    let export_config = ExportTaskConfig {
        export_file_path: Some(export_path.clone()),
        base_file_path: Some(site.clone()),
        prefix_ids_in_content_files: true,
        ..ExportTaskConfig::default()
    };
    let mut task = ExportTask::new(export_config, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    run_task(&mut task, &[&strings], TaskOutput::InPlace)?;

    let export_file = ExportFile::load(&export_path)?;
    assert_eq!(export_file.get("./i18n/strings:title").map(|c| c.content.as_str()), Some("Home"));
    assert_eq!(export_file.get("./i18n/strings:save").unwrap().sources, vec!["./i18n/strings.json"]);

    let mut translated = ImportFile::new();
    translated.set("./", "./i18n/strings:title", "Accueil");
    translated.set("./", "./i18n/strings:save", "Enregistrer");
    let import_path = dir.path().join("import.json");
    translated.save(&import_path)?;

    let import_config = ImportTaskConfig {
        import_file_paths: vec![import_path],
        base_file_path: Some(site.clone()),
        prefix_ids_in_content_files: true,
        ..ImportTaskConfig::default()
    };
    let mut task = ImportTask::new(import_config, config.template_parser::<HtmlDocument>(HashRegistry::new())?)?;
    run_task(&mut task, &[&strings], TaskOutput::InPlace)?;

    let localized: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&strings)?)?;
    assert_eq!(localized, serde_json::json!({ "title": "Accueil", "save": "Enregistrer" }));
    Ok(())
}
