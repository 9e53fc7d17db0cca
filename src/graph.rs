//! Resolve and load modules for the bundler.

use std::{path::Path, sync::Arc};

use crate::{
    error::Error,
    store::ModuleStore,
    util::path::{clean, dirname, is_internal, join, unix_style},
};

/// A module-graph view handed to the bundler.
///
/// The view shares the read-only module store, is rooted at one entry id,
/// and implements the two operations graph construction needs: resolving
/// an import specifier against an importer, and loading a resolved id.
///
/// Resolution is two-tier: the virtual store first, then the real file
/// system when `allow_real_files` is enabled. In the default hermetic
/// mode, any id outside the store fails to load.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    store: Arc<ModuleStore>,
    entry: String,
    implied_extensions: Option<Vec<String>>,
    allow_real_files: bool,
}

impl ModuleGraph {
    pub(crate) fn new(
        store: Arc<ModuleStore>,
        entry: String,
        implied_extensions: Option<Vec<String>>,
        allow_real_files: bool,
    ) -> Self {
        Self {
            store,
            entry,
            implied_extensions,
            allow_real_files,
        }
    }

    pub(crate) fn rooted_at(mut self, entry: String) -> Self {
        self.entry = entry;
        self
    }

    /// Return the entry id this view is rooted at.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Resolve an import specifier to a module id.
    ///
    /// Bare specifiers are rewritten to `./<specifier>` so they never
    /// collide with internal paths in the store. Relative specifiers
    /// resolve against the importer's directory. `None` means no tier
    /// matched.
    pub fn resolve(&self, importee: &str, importer: Option<&str>) -> Option<String> {
        let importee = unix_style(importee);
        let importee = if is_internal(&importee) {
            importee
        } else {
            format!("./{importee}")
        };

        let candidate = match importer {
            Some(importer) if importee.starts_with("./") || importee.starts_with("../") => {
                join(dirname(importer), &importee)
            },
            _ => clean(&importee),
        };

        if let Some(key) = self
            .store
            .lookup(&candidate, self.implied_extensions.as_deref())
        {
            return Some(key.to_owned());
        }

        if self.allow_real_files {
            if Path::new(&candidate).exists() {
                return Some(candidate);
            }
            for extension in self.implied_extensions.as_deref().unwrap_or_default() {
                let probed = format!("{candidate}{extension}");
                if Path::new(&probed).exists() {
                    return Some(probed);
                }
            }
        }

        None
    }

    /// Load the source text of a resolved module id.
    ///
    /// Unknown ids fall through to the real file system when enabled, and
    /// fail otherwise.
    pub fn load(&self, id: &str) -> Result<String, Error> {
        if let Some(entry) = self.store.get(id) {
            return Ok(entry.code.clone());
        }

        if self.allow_real_files {
            return std::fs::read_to_string(id).map_err(|source| Error::RealFile {
                path: id.into(),
                source,
            });
        }

        Err(Error::DoesNotExist { id: id.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        error::Error, file::VirtualFile, store::ModuleStore, util::temp_dir::TempDir,
    };

    use super::ModuleGraph;

    fn store(paths: &[&str]) -> Arc<ModuleStore> {
        let mut store = ModuleStore::new();
        for path in paths {
            store
                .insert(VirtualFile::new(*path, "/", format!("// {path}")))
                .expect("failed to insert file");
        }
        Arc::new(store)
    }

    fn graph(store: Arc<ModuleStore>, entry: &str) -> ModuleGraph {
        ModuleGraph::new(
            store,
            entry.to_owned(),
            Some(vec![String::from(".js")]),
            false,
        )
    }

    #[test]
    fn resolves_relative_imports() {
        let graph = graph(store(&["/app/x.js", "/app/lib/y.js"]), "/app/x.js");

        assert_eq!(
            graph.resolve("./lib/y.js", Some("/app/x.js")),
            Some(String::from("/app/lib/y.js"))
        );
        assert_eq!(
            graph.resolve("../x.js", Some("/app/lib/y.js")),
            Some(String::from("/app/x.js"))
        );
        assert_eq!(graph.resolve("./missing.js", Some("/app/x.js")), None);
    }

    #[test]
    fn probes_implied_extensions() {
        let graph = graph(store(&["/app/x.js"]), "/app/x.js");

        assert_eq!(
            graph.resolve("./x", Some("/app/main.js")),
            Some(String::from("/app/x.js"))
        );
        assert_eq!(graph.resolve("/app/x", None), Some(String::from("/app/x.js")));
    }

    #[test]
    fn rewrites_bare_specifiers() {
        let graph = graph(store(&["/app/lodash.js"]), "/app/x.js");

        assert_eq!(
            graph.resolve("lodash", Some("/app/x.js")),
            Some(String::from("/app/lodash.js"))
        );
    }

    #[test]
    fn hermetic_load_fails_outside_the_store() {
        let graph = graph(store(&["/app/x.js"]), "/app/x.js");

        let error = graph.load("/app/missing.js").unwrap_err();
        assert!(matches!(error, Error::DoesNotExist { .. }));
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn falls_through_to_real_files() {
        let temp_dir = TempDir::new();
        let dir = temp_dir.path();
        let path = dir.join("real.js");

        std::fs::write(&path, "real.value = 1;").expect("failed to create file");

        let id = path.to_str().unwrap().to_owned();
        let graph = ModuleGraph::new(
            store(&["/app/x.js"]),
            String::from("/app/x.js"),
            Some(vec![String::from(".js")]),
            true,
        );

        assert_eq!(graph.resolve(&id, None), Some(id.clone()));
        assert_eq!(graph.load(&id).unwrap(), "real.value = 1;");
    }
}
