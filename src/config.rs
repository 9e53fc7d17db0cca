//! Configure the bundling stage.

use std::collections::HashMap;
use std::future::Future;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::{cache::BundleCache, error::Error};

/// Configuration for the bundling stage.
///
/// Only the fields below are interpreted by the stage itself; everything
/// in [`OutputOptions::extra`] is forwarded verbatim to the bundler.
pub struct Config {
    /// Entry points to bundle. Required.
    pub input: Option<EntrySpec>,

    /// Output options forwarded to the bundler's generate step.
    pub output: OutputOptions,

    /// Fall through to the real file system for ids missing from the
    /// virtual store. Disabled by default: resolution is hermetic.
    pub allow_real_files: bool,

    /// Extensions probed, in order, when an id has no exact match.
    ///
    /// `None` disables probing entirely.
    pub implied_extensions: Option<Vec<String>>,

    /// Default bundler cache, shared by entries without a separate one.
    pub cache: Option<BundleCache>,

    /// Per-entry bundler caches, keyed by declared entry id.
    pub separate_caches: HashMap<String, BundleCache>,

    /// Merge every entry's module metadata into one cross-entry cache.
    pub generate_unified_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: OutputOptions::default(),
            allow_real_files: false,
            implied_extensions: Some(vec![String::from(".js")]),
            cache: None,
            separate_caches: HashMap::new(),
            generate_unified_cache: false,
        }
    }
}

/// Output options forwarded to the bundler.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output format name, interpreted by the bundler.
    pub format: Option<String>,

    /// Generate a source map.
    ///
    /// `None` derives the flag from the input files: maps are generated
    /// if and only if the inputs carried them.
    pub sourcemap: Option<bool>,

    /// Bundler-specific options, forwarded verbatim and never interpreted
    /// by the stage.
    pub extra: Map<String, Value>,
}

/// The configured entry-point specification.
///
/// The deferred form lets a producer declare entries that are not known
/// until later; the stage always waits for the value to settle, after the
/// input stream has drained, before reading the module store.
pub enum EntrySpec {
    /// A single entry path.
    Path(String),

    /// An ordered list of entry paths.
    Paths(Vec<String>),

    /// An asynchronous value producing the entry list.
    Deferred(BoxFuture<'static, anyhow::Result<Vec<String>>>),
}

impl EntrySpec {
    /// Create a deferred specification from a future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Vec<String>>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Normalize the specification into an ordered entry list.
    ///
    /// Duplicates keep their first position. A failed deferred value is
    /// the run's terminal error.
    pub async fn resolve_entries(self) -> Result<Vec<String>, Error> {
        let entries = match self {
            Self::Path(path) => vec![path],
            Self::Paths(paths) => paths,
            Self::Deferred(future) => {
                future.await.map_err(|source| Error::EntrySpec { source })?
            },
        };

        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            if !resolved.contains(&entry) {
                resolved.push(entry);
            }
        }
        Ok(resolved)
    }
}

impl From<&str> for EntrySpec {
    fn from(path: &str) -> Self {
        Self::Path(path.to_owned())
    }
}

impl From<String> for EntrySpec {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<String>> for EntrySpec {
    fn from(paths: Vec<String>) -> Self {
        Self::Paths(paths)
    }
}

impl<const N: usize> From<[&str; N]> for EntrySpec {
    fn from(paths: [&str; N]) -> Self {
        Self::Paths(paths.into_iter().map(ToOwned::to_owned).collect())
    }
}
