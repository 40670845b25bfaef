/*!
 * Export and import files.
 *
 * An export file lists the contents found in a set of templates, keyed by
 * content id. An import file holds translated contents, grouped by scope
 * path, so that a template only picks up content meant for it or one of
 * its parent folders.
 *
 * The format is chosen by file name extension. Only JSON is supported.
 */

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ContentFileError;
use crate::file_utils::FileManager;

/// Scope path matching every template
pub const ROOT_SCOPE: &str = "./";

/// Supported content file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFileFormat {
    Json,
}

impl ContentFileFormat {
    /// Picks the format for a file name extension, with or without the leading dot
    pub fn from_extension(extension: &str) -> Result<Self, ContentFileError> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            _ => Err(ContentFileError::UnsupportedFormat(extension.to_string())),
        }
    }
}

fn check_relative_path(path: &str) -> Result<(), ContentFileError> {
    if path.starts_with(ROOT_SCOPE) {
        Ok(())
    } else {
        Err(ContentFileError::InvalidPath(path.to_string()))
    }
}

/// Prefixes a content id with the path of the file it belongs to.
///
/// Given the id `baz` and the path `./foo/bar.json`, this returns
/// `./foo/bar:baz`. Ids starting with `./` or `/` are returned as is.
pub fn prefixed_content_id(id: &str, relative_path: &str) -> String {
    if id.starts_with("./") || id.starts_with('/') {
        return id.to_string();
    }

    let prefix = match Path::new(relative_path).extension() {
        Some(ext) => &relative_path[..relative_path.len() - ext.len() - 1],
        None => relative_path,
    };

    format!("{}:{}", prefix, id)
}

/// A file of localizable contents that is not a template, such as strings
/// used by code, holding one string per id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFile {
    contents: IndexMap<String, String>,
}

impl ContentFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The contents, in file order
    pub fn contents(&self) -> &IndexMap<String, String> {
        &self.contents
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.contents.get(id).map(String::as_str)
    }

    /// Sets the content for an id, keeping its position if it exists
    pub fn set(&mut self, id: &str, content: &str) {
        self.contents.insert(id.to_string(), content.to_string());
    }

    /// Parses a content file in the format for `extension`
    pub fn parse(text: &str, extension: &str) -> Result<Self, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }

    /// Serializes the content file in the format for `extension`
    pub fn stringify(&self, extension: &str) -> Result<String, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// A content entry in an export file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportedContent {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Every distinct context the content was found in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,

    /// Relative paths of the templates containing the content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// Contents exported from templates, keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportFile {
    contents: IndexMap<String, ExportedContent>,
}

impl ExportFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The exported contents, in the order they were first added
    pub fn contents(&self) -> &IndexMap<String, ExportedContent> {
        &self.contents
    }

    pub fn get(&self, id: &str) -> Option<&ExportedContent> {
        self.contents.get(id)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Adds content found in `source`.
    ///
    /// If the id is already present, only the source and context are
    /// added to the existing entry, unless they are already listed.
    pub fn set(&mut self, source: &str, id: &str, content: &str, hint: Option<&str>, context: Option<&str>) {
        let entry = self
            .contents
            .entry(id.to_string())
            .or_insert_with(|| ExportedContent {
                content: content.to_string(),
                hint: hint.map(str::to_string),
                ..Default::default()
            });

        if !entry.sources.iter().any(|s| s == source) {
            entry.sources.push(source.to_string());
        }

        if let Some(context) = context {
            if !entry.context.iter().any(|c| c == context) {
                entry.context.push(context.to_string());
            }
        }
    }

    /// Parses an export file in the format for `extension`
    pub fn parse(text: &str, extension: &str) -> Result<Self, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => {
                let file: Self = serde_json::from_str(text)?;

                for source in file.contents.values().flat_map(|c| c.sources.iter()) {
                    check_relative_path(source)?;
                }

                Ok(file)
            }
        }
    }

    /// Serializes the export file in the format for `extension`
    pub fn stringify(&self, extension: &str) -> Result<String, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;
        let extension = FileManager::extension(path);

        Self::parse(&text, &extension)
            .with_context(|| format!("Failed to load export file: {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self
            .stringify(&FileManager::extension(path))
            .with_context(|| format!("Failed to save export file: {:?}", path))?;

        FileManager::write_to_file(path, &text)
    }
}

/// Contents of one scope in an import file
pub type ScopeContents = IndexMap<String, String>;

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportEntry {
    Content(String),
    Scope(ScopeContents),
}

/// Translated contents, keyed by scope path and id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ImportFile {
    scopes: IndexMap<String, ScopeContents>,
}

impl ImportFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> &IndexMap<String, ScopeContents> {
        &self.scopes
    }

    /// Sets the content for an id within a scope
    pub fn set(&mut self, scope_path: &str, id: &str, content: &str) {
        self.scopes
            .entry(scope_path.to_string())
            .or_default()
            .insert(id.to_string(), content.to_string());
    }

    /// Gets the content for an id, as seen from the file at `file_path`.
    ///
    /// Every scope whose path is a prefix of `file_path` is searched, the
    /// longest first.
    pub fn get(&self, file_path: &str, id: &str) -> Option<&str> {
        let mut scopes: Vec<(&String, &ScopeContents)> = self
            .scopes
            .iter()
            .filter(|(scope_path, _)| file_path.starts_with(scope_path.as_str()))
            .collect();

        scopes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        scopes
            .into_iter()
            .find_map(|(_, contents)| contents.get(id))
            .map(String::as_str)
    }

    /// Parses an import file in the format for `extension`.
    ///
    /// Top level entries holding a string are placed in the root scope.
    pub fn parse(text: &str, extension: &str) -> Result<Self, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => {
                let entries: IndexMap<String, ImportEntry> = serde_json::from_str(text)?;
                let mut file = Self::new();

                for (key, entry) in entries {
                    match entry {
                        ImportEntry::Content(content) => file.set(ROOT_SCOPE, &key, &content),
                        ImportEntry::Scope(contents) => {
                            check_relative_path(&key)?;
                            file.scopes.entry(key).or_default().extend(contents);
                        }
                    }
                }

                Ok(file)
            }
        }
    }

    /// Serializes the import file in the format for `extension`
    pub fn stringify(&self, extension: &str) -> Result<String, ContentFileError> {
        match ContentFileFormat::from_extension(extension)? {
            ContentFileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;
        let extension = FileManager::extension(path);

        Self::parse(&text, &extension)
            .with_context(|| format!("Failed to load import file: {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self
            .stringify(&FileManager::extension(path))
            .with_context(|| format!("Failed to save import file: {:?}", path))?;

        FileManager::write_to_file(path, &text)
    }
}
