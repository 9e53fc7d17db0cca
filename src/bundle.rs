//! Drive the bundler.

use std::{future::Future, sync::Arc};

use futures::future::try_join_all;
use log::debug;

use crate::{
    cache::{BundleCache, ModuleRecord},
    config::{Config, OutputOptions},
    error::Error,
    graph::ModuleGraph,
    sourcemap::SourceMap,
    store::ModuleStore,
};

/// A bundling capability.
///
/// The stage treats compilation as opaque: the build step turns a module
/// graph into a bundle handle, and the generate step turns the handle
/// into output code. Implementations resolve and load modules exclusively
/// through the [`ModuleGraph`] they are given, which is what keeps
/// hermetic runs hermetic.
pub trait Bundler: Send + Sync {
    /// Handle produced by the build step.
    type Bundle: BuiltBundle + Send + Sync;

    /// Build the module graph rooted at `graph.entry()`.
    fn build(
        &self,
        graph: ModuleGraph,
        cache: Option<BundleCache>,
    ) -> impl Future<Output = anyhow::Result<Self::Bundle>> + Send;

    /// Generate output code for a built bundle.
    fn generate(
        &self,
        bundle: &Self::Bundle,
        options: &OutputOptions,
    ) -> impl Future<Output = anyhow::Result<GeneratedBundle>> + Send;
}

/// Module metadata exposed by a bundle handle.
pub trait BuiltBundle {
    /// Records for every module that participated in the bundle.
    fn modules(&self) -> &[ModuleRecord];
}

/// Output of the bundler's generate step for one entry.
#[derive(Debug, Clone)]
pub struct GeneratedBundle {
    /// Generated code.
    pub code: Vec<u8>,

    /// Generated source map, if requested.
    pub map: Option<SourceMap>,
}

/// Bundle every entry concurrently against the shared store.
///
/// Returns one generated bundle per entry, in entry order, keyed by the
/// entry's canonical id, plus the merged cross-entry cache when
/// unified-cache mode is on. The first failing entry fails the whole run;
/// results of the other entries are discarded.
pub(crate) async fn drive<B: Bundler>(
    bundler: &B,
    store: &Arc<ModuleStore>,
    entries: Vec<String>,
    config: &mut Config,
    options: &OutputOptions,
    on_bundle: Option<&(dyn Fn(&B::Bundle, &str) + Send + Sync)>,
) -> Result<(Vec<(String, GeneratedBundle)>, Option<BundleCache>), Error> {
    let mut jobs = Vec::with_capacity(entries.len());

    for declared in entries {
        let graph = ModuleGraph::new(
            Arc::clone(store),
            declared.clone(),
            config.implied_extensions.clone(),
            config.allow_real_files,
        );

        // Every entry must be locatable before any bundling starts.
        let id = graph
            .resolve(&declared, None)
            .ok_or_else(|| Error::DoesNotExist {
                id: declared.clone(),
            })?;
        let graph = graph.rooted_at(id.clone());

        let cache = config
            .separate_caches
            .remove(&declared)
            .or_else(|| config.cache.clone());

        jobs.push((declared, id, graph, cache));
    }

    let results = try_join_all(jobs.into_iter().map(|(declared, id, graph, cache)| {
        async move {
            debug!("bundling entry `{id}`");

            let bundle = bundler
                .build(graph, cache)
                .await
                .map_err(|source| Error::Bundle {
                    entry: declared.clone(),
                    source,
                })?;

            if let Some(notify) = on_bundle {
                notify(&bundle, &declared);
            }

            let generated = bundler
                .generate(&bundle, options)
                .await
                .map_err(|source| Error::Generate {
                    entry: declared,
                    source,
                })?;

            Ok::<_, Error>((id, bundle, generated))
        }
    }))
    .await?;

    let mut unified = config.generate_unified_cache.then(BundleCache::default);
    let mut outputs = Vec::with_capacity(results.len());

    for (id, bundle, generated) in results {
        if let Some(cache) = unified.as_mut() {
            cache.merge(bundle.modules())?;
        }
        outputs.push((id, generated));
    }

    Ok((outputs, unified))
}
