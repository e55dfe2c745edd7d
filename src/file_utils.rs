use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @reads: Whole file as bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @reads: Whole file as a string
    pub fn read_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @writes: String content, creating parent directories if needed
    pub fn write_string<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
    }

    // @generates: Output path next to the input file
    // @params: input_file, optional language code, extension
    pub fn output_path<P: AsRef<Path>>(
        input_file: P,
        language_code: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "subtitle".to_string());

        let file_name = match language_code {
            Some(code) => format!("{}.{}.{}", stem, code, extension),
            None => format!("{}.{}", stem, extension),
        };

        match input_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }
}
