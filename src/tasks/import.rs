/*!
 * Import task.
 *
 * Replaces the contents of templates and content files with the translated
 * contents found in one or more import files. Files are searched in order
 * and the first match wins.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content_file::{ContentFile, ImportFile};
use crate::errors::{ConfigError, ContentFileError};
use crate::file_utils::FileManager;
use crate::html::{Document, HtmlDocument};
use crate::template::{PreserveAnnotations, TemplateParser};

use super::{TemplateTask, content_file_id, is_content_file, scope_path};

/// What to do when an import file has no content for an id
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingContentHandling {
    /// Fail the file
    #[default]
    Error,
    /// Log a warning and keep the original content
    Warn,
    /// Keep the original content
    Ignore,
}

impl std::fmt::Display for MissingContentHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

impl std::str::FromStr for MissingContentHandling {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            _ => Err(ConfigError::MissingContent(s.to_string())),
        }
    }
}

/// Configuration of the import task
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ImportTaskConfig {
    /// Import files to read, searched in order
    #[serde(default)]
    pub import_file_paths: Vec<PathBuf>,

    #[serde(default)]
    pub preserve_annotations: PreserveAnnotations,

    #[serde(default)]
    pub missing_content_handling: MissingContentHandling,

    /// Path that scope paths in the import files are relative to
    #[serde(default)]
    pub base_file_path: Option<PathBuf>,

    /// Prefix ids in content files with the path of the file
    #[serde(default)]
    pub prefix_ids_in_content_files: bool,
}

/// Provides content for ids missing from the import files.
///
/// Called with the id and the scope path of the template. Returning `None`
/// falls back to the configured `MissingContentHandling`.
pub type MissingContentHandler = Box<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// Task importing translated contents into templates
pub struct ImportTask<D: Document = HtmlDocument> {
    config: ImportTaskConfig,
    parser: TemplateParser<D>,
    import_files: Vec<ImportFile>,
    missing_content_handler: Option<MissingContentHandler>,
}

impl<D: Document> ImportTask<D> {
    /// Creates the task, loading every configured import file
    pub fn new(config: ImportTaskConfig, parser: TemplateParser<D>) -> Result<Self> {
        let import_files = config
            .import_file_paths
            .iter()
            .map(|path| {
                ImportFile::load(path).with_context(|| format!("Error while loading file {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_import_files(config, parser, import_files))
    }

    /// Creates the task with import files that are already loaded
    pub fn with_import_files(config: ImportTaskConfig, parser: TemplateParser<D>, import_files: Vec<ImportFile>) -> Self {
        Self {
            config,
            parser,
            import_files,
            missing_content_handler: None,
        }
    }

    pub fn set_missing_content_handler(&mut self, handler: MissingContentHandler) {
        self.missing_content_handler = Some(handler);
    }

    /// Finds the content for `id`, or none if it is missing and that is allowed
    fn import_content(&self, scope: &str, file_path: &Path, id: &str) -> Result<Option<String>> {
        let found = self
            .import_files
            .iter()
            .find_map(|file| file.get(scope, id))
            .map(str::to_string)
            .or_else(|| self.missing_content_handler.as_ref().and_then(|handler| handler(id, scope)));

        if found.is_some() {
            return Ok(found);
        }

        let error = ContentFileError::MissingContent {
            id: id.to_string(),
            file: file_path.display().to_string(),
        };

        match self.config.missing_content_handling {
            MissingContentHandling::Error => Err(error.into()),
            MissingContentHandling::Warn => {
                log::warn!("{}", error);
                Ok(None)
            }
            MissingContentHandling::Ignore => Ok(None),
        }
    }

    /// Cleans the annotations in imported content
    fn clean_content(&self, content: String) -> Result<String> {
        if self.config.preserve_annotations == PreserveAnnotations::All {
            return Ok(content);
        }

        let mut template = self.parser.parse(&content)?;
        template.clean(self.config.preserve_annotations);

        Ok(template.to_html())
    }

    /// Replaces the contents of a content file, keeping its keys
    fn import_content_file(&self, file_path: &Path, scope: &str, text: &str) -> Result<String> {
        let extension = FileManager::extension(file_path);
        let mut content_file = ContentFile::parse(text, &extension)?;
        let keys: Vec<String> = content_file.contents().keys().cloned().collect();

        for key in &keys {
            let id = content_file_id(key, scope, self.config.prefix_ids_in_content_files);

            if let Some(content) = self.import_content(scope, file_path, &id)? {
                let content = self.clean_content(content)?;
                content_file.set(key, &content);
            }
        }

        log::debug!("Imported contents for {} ids into {}", keys.len(), scope);

        Ok(content_file.stringify(&extension)?)
    }
}

impl<D: Document> TemplateTask for ImportTask<D> {
    fn process(&mut self, file_path: &Path, template: &str) -> Result<String> {
        let scope = scope_path(file_path, self.config.base_file_path.as_ref());

        if is_content_file(file_path) {
            return self.import_content_file(file_path, &scope, template);
        }

        let mut parsed = self.parser.parse(template)?;

        let mut imported = 0;
        for index in 0..parsed.contents().len() {
            let id = parsed.content_id(index)?;

            if let Some(content) = self.import_content(&scope, file_path, &id)? {
                let content = self.clean_content(content)?;
                parsed.set_content(index, &content)?;
                imported += 1;
            }
        }

        log::debug!("Imported {} of {} contents into {}", imported, parsed.contents().len(), scope);

        parsed.clean(self.config.preserve_annotations);
        Ok(parsed.to_html())
    }
}
