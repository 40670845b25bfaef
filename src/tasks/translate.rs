/*!
 * Translate task.
 *
 * Produces an import file from an export file by running every content
 * through a content translator. Used with the pseudo translator to test
 * localization before real translations exist.
 */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content_file::{ExportFile, ImportFile, ROOT_SCOPE};
use crate::file_utils::FileManager;
use crate::translator::{ContentTranslator, TranslatorKind};

/// Configuration of the translate task
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct TranslateTaskConfig {
    #[serde(default)]
    pub translator: TranslatorKind,

    /// Extension of the import file, which determines its format.
    /// Defaults to the extension of the export file.
    #[serde(default)]
    pub file_name_extension: Option<String>,
}

/// Task translating export files into import files
#[derive(Debug)]
pub struct TranslateTask {
    config: TranslateTaskConfig,
    translator: Arc<dyn ContentTranslator>,
}

impl TranslateTask {
    pub fn new(config: TranslateTaskConfig, translator: Arc<dyn ContentTranslator>) -> Self {
        Self { config, translator }
    }

    /// Translates every content in `export_file` into an import file with a single root scope
    pub fn translate(&self, export_file: &ExportFile) -> Result<ImportFile> {
        let mut import_file = ImportFile::new();

        for (id, exported) in export_file.contents() {
            let translated = self
                .translator
                .translate(&exported.content)
                .with_context(|| format!("Failed to translate content with id '{}'", id))?;

            import_file.set(ROOT_SCOPE, id, &translated);
        }

        Ok(import_file)
    }

    /// Reads the export file at `input`, translates it and writes the import file to `output`
    pub fn run(&self, input: &Path, output: &Path) -> Result<ImportFile> {
        let export_file = ExportFile::load(input)?;
        let import_file = self
            .translate(&export_file)
            .with_context(|| format!("Error while processing file {}", input.display()))?;

        let extension = self
            .config
            .file_name_extension
            .clone()
            .unwrap_or_else(|| FileManager::extension(input));
        let text = import_file.stringify(&extension)?;
        FileManager::write_to_file(output, &text)?;

        log::info!(
            "Translated {} contents from {} to {} using the {} translator",
            export_file.len(),
            input.display(),
            output.display(),
            self.config.translator
        );

        Ok(import_file)
    }
}
