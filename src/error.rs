//! Stage errors.

use std::path::PathBuf;

use thiserror::Error;

/// Name identifying the stage in wrapped bundler errors.
pub const STAGE_NAME: &str = "passerelle";

/// List of errors for the bundling stage.
///
/// Every error is terminal for the run it occurs in: the stage reports it
/// once on its output boundary and emits nothing further.
#[derive(Debug, Error)]
pub enum Error {
    /// No entry point was configured.
    #[error("no `input` entry point was configured")]
    MissingInput,

    /// The deferred entry specification failed to settle.
    #[error("failed to resolve the deferred entry specification")]
    EntrySpec {
        /// Source error.
        source: anyhow::Error,
    },

    /// A file arrived without buffered contents.
    #[error("file `{path}` has no buffered contents (streamed contents are not supported)")]
    UnbufferedContents {
        /// File path.
        path: PathBuf,
    },

    /// A file's contents are not valid UTF-8.
    #[error("file `{path}` is not valid UTF-8")]
    NonUtf8Contents {
        /// File path.
        path: PathBuf,
        /// Source error.
        source: std::string::FromUtf8Error,
    },

    /// Some input files carry source maps and some do not.
    #[error("file `{path}` breaks the all-or-none source map rule for this run")]
    InconsistentSourceMaps {
        /// File path.
        path: PathBuf,
    },

    /// A module id matched neither the virtual store nor, when enabled,
    /// the real file system.
    #[error("`{id}` does not exist in the hypothetical file system")]
    DoesNotExist {
        /// Module id.
        id: String,
    },

    /// The bundler's build step failed.
    #[error("{}: bundling entry `{entry}` failed", STAGE_NAME)]
    Bundle {
        /// Declared entry id.
        entry: String,
        /// Source error.
        source: anyhow::Error,
    },

    /// The bundler's generate step failed.
    #[error("{}: generating output for entry `{entry}` failed", STAGE_NAME)]
    Generate {
        /// Declared entry id.
        entry: String,
        /// Source error.
        source: anyhow::Error,
    },

    /// Two entries reported different metadata for the same module.
    #[error("conflicting caches for module `{id}`")]
    ConflictingCaches {
        /// Module id.
        id: String,
    },

    /// A real file could not be read during fallthrough.
    #[error("failed to read `{path}` from the real file system")]
    RealFile {
        /// File path.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },

    /// The async runtime could not be started.
    #[error("failed to start the async runtime")]
    Runtime {
        /// Source error.
        source: std::io::Error,
    },

    /// The output channel was closed before the run completed.
    #[error("the output channel was closed before the run completed")]
    ChannelClosed,
}
