//! Compose output virtual files.

use std::path::{Path, PathBuf};

use log::trace;

use crate::{bundle::GeneratedBundle, file::VirtualFile, store::ModuleStore};

/// Map a generated bundle back onto an output virtual file.
///
/// When the store holds a file at the entry id (probing rules included,
/// so an entry declared without an extension still matches a file
/// declared with one), that file is taken back out, its contents and
/// source map are overwritten, and the same handle is returned, so
/// upstream metadata survives. Otherwise the entry was a real file reached
/// through fallthrough, and a fresh file is synthesized.
pub(crate) fn compose(
    store: &mut ModuleStore,
    entry_id: &str,
    generated: GeneratedBundle,
    implied_extensions: Option<&[String]>,
) -> VirtualFile {
    let key = store
        .lookup(entry_id, implied_extensions)
        .map(ToOwned::to_owned);

    let mut file = match key.and_then(|key| store.take(&key)) {
        Some(entry) => entry.file,
        None => {
            let path = PathBuf::from(entry_id);
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            VirtualFile::new(path, base, Vec::new())
        },
    };

    trace!("composing output for `{}`", file.path.display());

    file.contents = Some(generated.code);
    file.source_map = generated.map.map(|mut map| {
        map.rewrite_for_output(&file.path, &file.base);
        map
    });
    file
}
