//! A bundling stage for streaming build pipelines.
//!
//! Virtual files flow in on a channel and are buffered into an in-memory
//! module store; once the input ends, the store is exposed to an injected
//! bundler as a module resolver/loader. Each configured entry point is
//! bundled concurrently, and each resulting bundle is mapped back onto an
//! output virtual file, reusing the original entry file's handle when one
//! exists.
//!
//! By default resolution is hermetic: the bundler sees exactly the files
//! that arrived on the stream, and nothing else. Fallthrough to the real
//! file system is opt-in.

#![warn(missing_docs)]

pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod file;
pub mod graph;
pub mod sourcemap;
pub mod stage;
pub mod store;
pub mod util;

mod output;

pub use bundle::{BuiltBundle, Bundler, GeneratedBundle};
pub use cache::{BundleCache, ModuleRecord};
pub use config::{Config, EntrySpec, OutputOptions};
pub use error::Error;
pub use file::VirtualFile;
pub use graph::ModuleGraph;
pub use sourcemap::SourceMap;
pub use stage::BundleStage;
pub use store::{ModuleEntry, ModuleStore};
