use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Extension with leading dot, or empty string
    pub fn extension<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Expands a list of files and directories into the files they contain
    pub fn collect_files<P: AsRef<Path>>(inputs: &[P], extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if Self::dir_exists(input) {
                result.extend(Self::find_files(input, extension)?);
            } else if Self::file_exists(input) {
                result.push(input.to_path_buf());
            } else {
                return Err(anyhow::anyhow!("Input path does not exist: {:?}", input));
            }
        }

        Ok(result)
    }

    /// Gets the path of `path` relative to `base`, in the form `./dir/file.ext`.
    ///
    /// Both paths are compared as given, so they must both be absolute or
    /// both be relative to the same directory.
    pub fn relative_path<P1: AsRef<Path>, P2: AsRef<Path>>(path: P1, base: P2) -> String {
        let path = path.as_ref();
        let relative = path.strip_prefix(base.as_ref()).unwrap_or(path);

        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                std::path::Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        format!("./{}", parts.join("/"))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
