/*!
 * Tasks processing template files.
 *
 * - `export`: extracts the contents of templates into an export file
 * - `import`: writes translated contents from import files into templates
 * - `translate`: turns an export file into an import file using a translator
 *
 * The export and import tasks process one file at a time through the
 * `TemplateTask` trait, and report errors with the path of the file. Files
 * without the `.html` extension are read as content files instead of
 * templates.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::content_file::prefixed_content_id;
use crate::file_utils::FileManager;

pub mod export;
pub mod import;
pub mod translate;

pub use export::{ExportTask, ExportTaskConfig};
pub use import::{ImportTask, ImportTaskConfig, MissingContentHandling};
pub use translate::{TranslateTask, TranslateTaskConfig};

/// Common trait for tasks that rewrite templates
pub trait TemplateTask {
    /// Processes a single template
    ///
    /// # Arguments
    /// * `file_path` - Path of the template, used to scope content and in messages
    /// * `template` - The template text
    ///
    /// # Returns
    /// * `Result<String>` - The rewritten template
    fn process(&mut self, file_path: &Path, template: &str) -> Result<String>;

    /// Finishes the task after every template was processed
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Extension of template files. Other files are content files.
pub const TEMPLATE_EXTENSION: &str = "html";

pub(crate) fn is_content_file(file_path: &Path) -> bool {
    !file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}

/// Gets the id of the content under `key` in the content file at `scope`
pub(crate) fn content_file_id(key: &str, scope: &str, prefix_ids: bool) -> String {
    if prefix_ids {
        prefixed_content_id(key, scope)
    } else {
        key.to_string()
    }
}

/// Gets the path of a template relative to the base path, or to the
/// current directory if there is none
pub(crate) fn scope_path(file_path: &Path, base_file_path: Option<&PathBuf>) -> String {
    match base_file_path {
        Some(base) => FileManager::relative_path(file_path, base),
        None => FileManager::relative_path(file_path, ""),
    }
}

/// Where the templates rewritten by a task are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutput<'a> {
    /// Templates are only read
    Discard,
    /// Templates are overwritten when they changed
    InPlace,
    /// Templates are written below `dir`, at their path relative to `base`
    Directory { base: &'a Path, dir: &'a Path },
}

/// Processes template files one by one, then finalizes the task
pub fn run_task<T: TemplateTask, P: AsRef<Path>>(task: &mut T, files: &[P], output: TaskOutput<'_>) -> Result<()> {
    for file in files {
        let file = file.as_ref();
        let template = FileManager::read_to_string(file)?;

        let rewritten = task
            .process(file, &template)
            .with_context(|| format!("Error while processing file {}", file.display()))?;

        match output {
            TaskOutput::Discard => {}
            TaskOutput::InPlace => {
                if rewritten != template {
                    FileManager::write_to_file(file, &rewritten)?;
                    log::debug!("Updated {}", file.display());
                }
            }
            TaskOutput::Directory { base, dir } => {
                let destination = dir.join(file.strip_prefix(base).unwrap_or(file));
                FileManager::write_to_file(&destination, &rewritten)?;
                log::debug!("Wrote {}", destination.display());
            }
        }
    }

    task.finalize()
}
