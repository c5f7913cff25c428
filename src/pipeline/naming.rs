//! Candidate-path generation for numbered model sets

use crate::error::{AssetError, Result};

/// Directories probed by the probing scheme, in order
pub const PROBE_DIRECTORIES: [&str; 6] = ["./models", "./assets", ".", "models", "assets", ""];

/// Maps a slot index to the ordered list of paths to try
///
/// Slot `i` is named `<stem><first_number + i>.<extension>` and looked up in
/// each directory in turn; an empty directory means a bare file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
    stem: String,
    extension: String,
    directories: Vec<String>,
    first_number: usize,
}

impl NamingScheme {
    /// Scheme with explicit directories; at least one is required
    pub fn new<I, S>(stem: impl Into<String>, directories: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directories: Vec<String> = directories.into_iter().map(Into::into).collect();
        if directories.is_empty() {
            return Err(AssetError::InvalidArgument(
                "naming scheme needs at least one directory".to_string(),
            ));
        }
        Ok(Self {
            stem: stem.into(),
            extension: "glb".to_string(),
            directories,
            first_number: 1,
        })
    }

    /// One directory only, e.g. `./models/M1.glb`
    pub fn single(directory: impl Into<String>, stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            extension: "glb".to_string(),
            directories: vec![directory.into()],
            first_number: 1,
        }
    }

    /// Probe the six conventional locations relative to the document root
    pub fn probing(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            extension: "glb".to_string(),
            directories: PROBE_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
            first_number: 1,
        }
    }

    /// Use `extension` instead of `glb`
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Number the file of slot 0 with `first_number`
    pub fn with_first_number(mut self, first_number: usize) -> Self {
        self.first_number = first_number;
        self
    }

    /// Get the file name stem
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Get the probed directories, in order
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// File name for slot `index`
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.stem, self.first_number + index, self.extension)
    }

    /// Ordered candidate paths for slot `index`
    pub fn candidates(&self, index: usize) -> Vec<String> {
        let file = self.file_name(index);
        self.directories
            .iter()
            .map(|dir| {
                if dir.is_empty() {
                    file.clone()
                } else {
                    format!("{}/{}", dir.trim_end_matches('/'), file)
                }
            })
            .collect()
    }
}
