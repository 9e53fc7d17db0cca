//! Bundle virtual files arriving on a stream.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use log::{debug, info};
use tokio::runtime::Runtime;

use crate::{
    bundle::{drive, Bundler},
    cache::BundleCache,
    config::Config,
    error::Error,
    file::VirtualFile,
    output,
    store::ModuleStore,
};

/// The bundling stage.
///
/// The stage buffers every virtual file arriving on its input channel,
/// and once the channel closes, bundles each configured entry point
/// against the buffered store and emits one output file per entry.
///
/// The bundler capability is injected at construction, so tests and
/// alternative compilers substitute freely.
pub struct BundleStage<B: Bundler> {
    bundler: B,
    on_bundle: Option<Box<dyn Fn(&B::Bundle, &str) + Send + Sync>>,
    on_unified_cache: Option<Box<dyn Fn(&BundleCache) + Send + Sync>>,
}

impl<B: Bundler> BundleStage<B> {
    /// Create a bundling stage around a bundler.
    pub fn new(bundler: B) -> Self {
        Self {
            bundler,
            on_bundle: None,
            on_unified_cache: None,
        }
    }

    /// Observe each raw bundle handle before code generation, tagged
    /// with its declared entry id.
    pub fn on_bundle<F>(mut self, observer: F) -> Self
    where
        F: Fn(&B::Bundle, &str) + Send + Sync + 'static,
    {
        self.on_bundle = Some(Box::new(observer));
        self
    }

    /// Observe the merged cross-entry cache, once, after all entries
    /// complete. Only called in unified-cache mode.
    pub fn on_unified_cache<F>(mut self, observer: F) -> Self
    where
        F: Fn(&BundleCache) + Send + Sync + 'static,
    {
        self.on_unified_cache = Some(Box::new(observer));
        self
    }

    /// Run the stage on a dedicated runtime, blocking until completion.
    pub fn run(
        &self,
        config: Config,
        rx: Receiver<VirtualFile>,
        tx: Sender<VirtualFile>,
    ) -> Result<(), Error> {
        let rt = Runtime::new().map_err(|source| Error::Runtime { source })?;
        rt.block_on(self.process(config, rx, tx))
    }

    /// Process the stream: buffer until `rx` closes, bundle every entry,
    /// and emit one output file per entry on `tx`.
    ///
    /// Returns `Ok(())` once every output has been emitted. Any failure
    /// aborts the run: nothing further is emitted after the error point.
    pub async fn process(
        &self,
        mut config: Config,
        rx: Receiver<VirtualFile>,
        tx: Sender<VirtualFile>,
    ) -> Result<(), Error> {
        // A missing entry configuration fails before any file is read.
        let spec = config.input.take().ok_or(Error::MissingInput)?;

        let mut store = ModuleStore::new();
        while let Ok(file) = rx.recv().await {
            store.insert(file)?;
        }
        debug!("buffered {} virtual files", store.len());

        // The input has drained; a deferred entry value may settle now.
        let entries = spec.resolve_entries().await?;

        let mut options = config.output.clone();
        if options.sourcemap.is_none() {
            options.sourcemap = Some(store.has_source_maps());
        }

        let store = Arc::new(store);
        let (outputs, unified) = drive(
            &self.bundler,
            &store,
            entries,
            &mut config,
            &options,
            self.on_bundle.as_deref(),
        )
        .await?;

        if let (Some(cache), Some(notify)) = (&unified, &self.on_unified_cache) {
            notify(cache);
        }

        // Every bundling future has completed, so no graph still shares
        // the store.
        let mut store = Arc::try_unwrap(store).unwrap_or_else(|shared| (*shared).clone());

        let count = outputs.len();
        for (id, generated) in outputs {
            let file = output::compose(
                &mut store,
                &id,
                generated,
                config.implied_extensions.as_deref(),
            );
            tx.send(file).await.map_err(|_| Error::ChannelClosed)?;
        }
        info!("emitted {count} bundled files");

        Ok(())
    }
}
