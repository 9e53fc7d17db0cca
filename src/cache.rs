//! Bundler caches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Per-module metadata reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Module id.
    pub id: String,

    /// Module source text as the bundler consumed it.
    pub code: String,

    /// Resolution decisions made while scanning the module, keyed by
    /// import specifier.
    #[serde(default)]
    pub resolved_ids: BTreeMap<String, String>,
}

/// A reusable record of per-module bundling metadata.
///
/// A cache produced by one run can be handed back to a later run, either
/// as the shared default cache or as a per-entry cache, to reproduce or
/// accelerate the pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleCache {
    /// Module records, in first-seen order.
    pub modules: Vec<ModuleRecord>,
}

impl BundleCache {
    /// Return the record for a module id.
    pub fn get(&self, id: &str) -> Option<&ModuleRecord> {
        self.modules.iter().find(|module| module.id == id)
    }

    /// Merge records reported by one entry into the unified cache.
    ///
    /// Entries must report identical metadata for a shared module; a
    /// mismatch makes the cache unsound and fails the run.
    pub(crate) fn merge(&mut self, records: &[ModuleRecord]) -> Result<(), Error> {
        for record in records {
            match self.get(&record.id) {
                Some(existing) if existing == record => {},
                Some(_) => {
                    return Err(Error::ConflictingCaches {
                        id: record.id.clone(),
                    });
                },
                None => self.modules.push(record.clone()),
            }
        }
        Ok(())
    }
}
