//! Buffer virtual files into an in-memory module store.

use std::collections::HashMap;

use log::trace;

use crate::{error::Error, file::VirtualFile};

/// A module buffered in the store.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    /// Original virtual file, re-emitted for matching entry points.
    pub file: VirtualFile,

    /// Module source text, decoded once at arrival.
    pub code: String,
}

/// An in-memory module store keyed by normalized path.
///
/// The store fills up while the input stream is open and is read-only
/// once bundling starts. Inserting a path twice overwrites the previous
/// entry.
#[derive(Debug, Clone, Default)]
pub struct ModuleStore {
    modules: HashMap<String, ModuleEntry>,
    has_source_maps: Option<bool>,
}

impl ModuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a virtual file and insert it under its normalized path.
    ///
    /// Files must carry buffered UTF-8 contents, and either every file in
    /// a run has a source map or none does.
    pub fn insert(&mut self, mut file: VirtualFile) -> Result<(), Error> {
        let Some(contents) = file.contents.take() else {
            return Err(Error::UnbufferedContents { path: file.path });
        };

        let has_map = file.source_map.is_some();
        if *self.has_source_maps.get_or_insert(has_map) != has_map {
            return Err(Error::InconsistentSourceMaps { path: file.path });
        }

        let code = String::from_utf8(contents).map_err(|source| Error::NonUtf8Contents {
            path: file.path.clone(),
            source,
        })?;
        file.contents = Some(code.clone().into_bytes());

        let id = file.id();
        trace!("buffered `{id}` ({} bytes)", code.len());
        self.modules.insert(id, ModuleEntry { file, code });
        Ok(())
    }

    /// Return the entry stored under an exact id.
    pub fn get(&self, id: &str) -> Option<&ModuleEntry> {
        self.modules.get(id)
    }

    /// Look up an id, probing implied extensions on an exact miss.
    ///
    /// Returns the canonical key of the matching entry. Probing tries
    /// each extension in the configured order, first hit wins; `None`
    /// disables probing entirely.
    pub fn lookup(&self, id: &str, implied_extensions: Option<&[String]>) -> Option<&str> {
        if let Some((key, _)) = self.modules.get_key_value(id) {
            return Some(key);
        }

        for extension in implied_extensions.unwrap_or_default() {
            let probed = format!("{id}{extension}");
            if let Some((key, _)) = self.modules.get_key_value(probed.as_str()) {
                return Some(key);
            }
        }

        None
    }

    /// Remove and return the entry stored under an exact id.
    pub fn take(&mut self, id: &str) -> Option<ModuleEntry> {
        self.modules.remove(id)
    }

    /// Determine if the buffered files carry source maps.
    pub fn has_source_maps(&self) -> bool {
        self.has_source_maps.unwrap_or(false)
    }

    /// Number of buffered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Determine if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::Error, file::VirtualFile, sourcemap::SourceMap};

    use super::ModuleStore;

    const NO_EXTENSIONS: &[String] = &[];

    fn implied() -> Vec<String> {
        vec![String::from(".js")]
    }

    #[test]
    fn last_write_wins() {
        let mut store = ModuleStore::new();
        store
            .insert(VirtualFile::new("/x.js", "/", "first"))
            .unwrap();
        store
            .insert(VirtualFile::new("/x.js", "/", "second"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/x.js").unwrap().code, "second");
    }

    #[test]
    fn lookup_probes_implied_extensions() {
        let mut store = ModuleStore::new();
        store.insert(VirtualFile::new("/x.js", "/", "")).unwrap();

        assert_eq!(store.lookup("/x.js", Some(&implied())), Some("/x.js"));
        assert_eq!(store.lookup("/x", Some(&implied())), Some("/x.js"));
        assert_eq!(store.lookup("/x", Some(NO_EXTENSIONS)), None);
        assert_eq!(store.lookup("/x", None), None);
    }

    #[test]
    fn rejects_unbuffered_contents() {
        let mut store = ModuleStore::new();
        let file = VirtualFile {
            contents: None,
            ..VirtualFile::new("/x.js", "/", "")
        };

        assert!(matches!(
            store.insert(file),
            Err(Error::UnbufferedContents { .. })
        ));
    }

    #[test]
    fn rejects_mixed_source_map_presence() {
        let mut store = ModuleStore::new();
        store
            .insert(VirtualFile::new("/x.js", "/", "").with_source_map(SourceMap::new([])))
            .unwrap();

        assert!(matches!(
            store.insert(VirtualFile::new("/y.js", "/", "")),
            Err(Error::InconsistentSourceMaps { .. })
        ));
        assert!(store.has_source_maps());
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut store = ModuleStore::new();
        let file = VirtualFile::new("/x.js", "/", vec![0xff, 0xfe]);

        assert!(matches!(
            store.insert(file),
            Err(Error::NonUtf8Contents { .. })
        ));
    }
}
