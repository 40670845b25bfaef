/*!
 * Export task.
 *
 * Collects the contents of every processed template and content file into
 * one export file, and optionally rewrites the templates with normalized
 * content, ids in place of content, or cleaned annotations. Content files
 * are never rewritten.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content_file::{ContentFile, ExportFile};
use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::html::{Document, HtmlDocument};
use crate::template::{PreserveAnnotations, TemplateParser};

use super::{TemplateTask, content_file_id, is_content_file, scope_path};

/// Configuration of the export task
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExportTaskConfig {
    /// Where to save the export file, or none to skip exporting
    #[serde(default)]
    pub export_file_path: Option<PathBuf>,

    /// Add to an existing export file instead of replacing it
    #[serde(default)]
    pub update_export_file: bool,

    /// Rewrite contents in their normalized form
    #[serde(default)]
    pub normalize_content: bool,

    #[serde(default)]
    pub preserve_annotations: PreserveAnnotations,

    /// Replace each content with this text, where `*` is replaced by the content id
    #[serde(default)]
    pub replace_with_ids: Option<String>,

    /// Export contents that have an explicit id
    #[serde(default)]
    pub export_for_id: bool,

    #[serde(default = "default_true")]
    pub log_suspected_orphans: bool,

    /// Prefix ids in content files with the path of the file
    #[serde(default)]
    pub prefix_ids_in_content_files: bool,

    /// Path that source paths in the export file are relative to
    #[serde(default)]
    pub base_file_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for ExportTaskConfig {
    fn default() -> Self {
        Self {
            export_file_path: None,
            update_export_file: false,
            normalize_content: false,
            preserve_annotations: PreserveAnnotations::default(),
            replace_with_ids: None,
            export_for_id: false,
            log_suspected_orphans: true,
            prefix_ids_in_content_files: false,
            base_file_path: None,
        }
    }
}

impl ExportTaskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(replacement) = &self.replace_with_ids {
            if replacement.matches('*').count() != 1 {
                return Err(ConfigError::ReplaceWithIds(replacement.clone()));
            }
        }

        Ok(())
    }
}

/// Task exporting the contents of templates
pub struct ExportTask<D: Document = HtmlDocument> {
    config: ExportTaskConfig,
    parser: TemplateParser<D>,
    export_file: ExportFile,
}

impl<D: Document> ExportTask<D> {
    /// Creates the task, loading the existing export file when updating it
    pub fn new(config: ExportTaskConfig, parser: TemplateParser<D>) -> Result<Self> {
        config.validate()?;

        let export_file = match &config.export_file_path {
            Some(path) if config.update_export_file && path.exists() => ExportFile::load(path)
                .with_context(|| format!("Error while loading file {}", path.display()))?,
            _ => ExportFile::new(),
        };

        Ok(Self {
            config,
            parser,
            export_file,
        })
    }

    /// The contents exported so far
    pub fn export_file(&self) -> &ExportFile {
        &self.export_file
    }

    fn export_content_file(&mut self, file_path: &Path, source: &str, text: &str) -> Result<()> {
        let content_file = ContentFile::parse(text, &FileManager::extension(file_path))?;

        if self.config.export_file_path.is_none() {
            return Ok(());
        }

        for (key, content) in content_file.contents() {
            let id = content_file_id(key, source, self.config.prefix_ids_in_content_files);
            self.export_file.set(source, &id, content, None, None);
        }

        log::debug!("Found {} contents in {}", content_file.contents().len(), source);
        Ok(())
    }
}

impl<D: Document> TemplateTask for ExportTask<D> {
    fn process(&mut self, file_path: &Path, template: &str) -> Result<String> {
        let source = scope_path(file_path, self.config.base_file_path.as_ref());

        if is_content_file(file_path) {
            self.export_content_file(file_path, &source, template)?;
            return Ok(template.to_string());
        }

        let mut parsed = self.parser.parse(template)?;
        let needs_ids = self.config.export_file_path.is_some() || self.config.replace_with_ids.is_some();

        let mut entries = Vec::with_capacity(parsed.contents().len());
        for index in 0..parsed.contents().len() {
            let annotation = parsed.content_annotation(index)?;
            let content = parsed.content(index)?;

            if self.config.log_suspected_orphans && annotation.is_suspected_orphan() {
                log::warn!(
                    "The direct annotation with content '{}' in file {} could be an orphaned annotation.",
                    content,
                    file_path.display()
                );
            }

            let id = if needs_ids { Some(parsed.content_id(index)?) } else { None };
            let options = annotation.options();
            let export = options
                .export
                .unwrap_or(self.config.export_for_id || options.id.is_none());

            if let (true, Some(id), Some(_)) = (export, &id, &self.config.export_file_path) {
                self.export_file.set(
                    &source,
                    id,
                    &content,
                    options.hint.as_deref(),
                    options.context.as_deref(),
                );
            }

            entries.push((id, content));
        }

        log::debug!("Found {} contents in {}", entries.len(), source);

        if let Some(replacement) = &self.config.replace_with_ids {
            for (index, (id, _)) in entries.iter().enumerate() {
                if let Some(id) = id {
                    parsed.set_content(index, &replacement.replacen('*', id, 1))?;
                }
            }
        } else if self.config.normalize_content {
            for (index, (_, content)) in entries.iter().enumerate() {
                parsed.set_content(index, content)?;
            }
        }

        let rewrite = self.config.replace_with_ids.is_some()
            || self.config.normalize_content
            || self.config.preserve_annotations != PreserveAnnotations::All;

        if !rewrite {
            return Ok(template.to_string());
        }

        parsed.clean(self.config.preserve_annotations);
        Ok(parsed.to_html())
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(path) = &self.config.export_file_path {
            self.export_file.save(path)?;
            log::info!("Exported {} contents to {}", self.export_file.len(), path.display());
        }

        Ok(())
    }
}
