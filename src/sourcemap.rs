//! Source maps.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::util::path::{relative_from, unix_style};

/// A source map, following the source map v3 format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Format version.
    pub version: u32,

    /// Name of the generated file this map belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Root prepended to entries of `sources`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Original source paths.
    pub sources: Vec<String>,

    /// Original source contents, parallel to `sources`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,

    /// Symbol names referenced by `mappings`.
    pub names: Vec<String>,

    /// Encoded mapping data.
    pub mappings: String,
}

impl SourceMap {
    /// Create an empty version 3 map for a set of sources.
    pub fn new(sources: impl IntoIterator<Item = String>) -> Self {
        Self {
            version: 3,
            sources: sources.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Rewrite the map for an output file.
    ///
    /// Sets `file` and makes every entry of `sources` relative to the
    /// output file's base directory, in forward-slash form.
    pub fn rewrite_for_output(&mut self, path: &Path, base: &Path) {
        self.file = Some(unix_style(
            relative_from(base, path).to_string_lossy(),
        ));
        self.sources = self
            .sources
            .iter()
            .map(|source| {
                unix_style(relative_from(base, Path::new(source)).to_string_lossy())
            })
            .collect();
    }
}
