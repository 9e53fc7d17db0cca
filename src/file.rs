//! Virtual files.

use std::path::PathBuf;

use serde_json::Value;

use crate::{sourcemap::SourceMap, util::path::unix_style};

/// An in-memory file flowing through the pipeline.
///
/// A virtual file carries a path, buffered byte contents, and optionally a
/// source map. The `data` value is arbitrary upstream metadata: the stage
/// re-emits the stored file for matching entry points, so whatever a
/// producer attached here survives bundling untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualFile {
    /// File path.
    pub path: PathBuf,

    /// Base directory, used to relativize paths in generated source maps.
    pub base: PathBuf,

    /// Buffered file contents.
    ///
    /// `None` marks contents that were not buffered (e.g. still
    /// streaming); the stage rejects such files.
    pub contents: Option<Vec<u8>>,

    /// Source map attached to the contents.
    pub source_map: Option<SourceMap>,

    /// Arbitrary upstream metadata, passed through untouched.
    pub data: Value,
}

impl VirtualFile {
    /// Create a virtual file with buffered contents.
    pub fn new(
        path: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents: Some(contents.into()),
            source_map: None,
            data: Value::Null,
        }
    }

    /// Attach a source map.
    pub fn with_source_map(mut self, map: SourceMap) -> Self {
        self.source_map = Some(map);
        self
    }

    /// Attach upstream metadata.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Return the module id of the file: its path in forward-slash form.
    pub fn id(&self) -> String {
        unix_style(self.path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::VirtualFile;

    #[test]
    #[cfg(unix)]
    fn id_is_forward_slash_path() {
        let file = VirtualFile::new("/app/x.js", "/app", "");
        assert_eq!(file.id(), "/app/x.js");
    }

    #[test]
    fn data_defaults_to_null() {
        let file = VirtualFile::new("/x.js", "/", "");
        assert!(file.data.is_null());

        let file = file.with_data(json!({"origin": "upstream"}));
        assert_eq!(file.data, json!({"origin": "upstream"}));
    }
}
