//! Utility functions for module paths.
//!
//! The virtual module store is keyed by forward-slash paths regardless of
//! the platform the stage runs on, so every path crossing the store
//! boundary goes through [`unix_style`] first.

use std::path::{Path, PathBuf};

/// Convert a native path to forward-slash form.
///
/// Only the platform separator is rewritten; on Unix, backslashes inside
/// file names are preserved.
pub fn unix_style(path: impl AsRef<str>) -> String {
    path.as_ref()
        .split(std::path::MAIN_SEPARATOR)
        .collect::<Vec<_>>()
        .join("/")
}

/// Determine if a specifier refers to a file system location.
///
/// Absolute paths, drive-letter paths, and `./`/`../` forms are internal;
/// anything else is a bare specifier.
pub fn is_internal(specifier: &str) -> bool {
    specifier.starts_with('/')
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || has_drive_letter(specifier)
}

/// Determine if a specifier starts with a Windows drive letter.
fn has_drive_letter(specifier: &str) -> bool {
    let bytes = specifier.as_bytes();

    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Remove `.` segments and fold `..` segments of a forward-slash path.
///
/// Unlike `std::fs::canonicalize`, the file system is never consulted.
pub fn clean(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push(segment);
                }
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");

    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        String::from(".")
    } else {
        joined
    }
}

/// Return the directory portion of a module id.
pub fn dirname(id: &str) -> &str {
    match id.rfind('/') {
        Some(0) => "/",
        Some(index) => &id[..index],
        None => ".",
    }
}

/// Join a relative specifier onto a base directory and clean the result.
pub fn join(base: &str, relative: &str) -> String {
    clean(&format!("{base}/{relative}"))
}

/// Compute the path of `path` relative to the `base` directory.
///
/// When the two disagree on being absolute, `path` is returned unchanged.
pub fn relative_from(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    use std::path::Component;

    let (base, path) = (base.as_ref(), path.as_ref());

    if base.is_absolute() != path.is_absolute() {
        return path.to_path_buf();
    }

    let mut base_components = base.components().peekable();
    let mut path_components = path.components().peekable();

    while let (Some(b), Some(p)) = (base_components.peek(), path_components.peek()) {
        if b != p {
            break;
        }
        base_components.next();
        path_components.next();
    }

    let mut result = PathBuf::new();
    for component in base_components {
        if component != Component::CurDir {
            result.push("..");
        }
    }
    result.extend(path_components);
    result
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(unix)]
    fn unix_style() {
        const CASES: [(&str, &str); 3] = [
            ("/foo/bar.js", "/foo/bar.js"),
            ("foo/bar.js", "foo/bar.js"),
            ("foo/bar\\baz.js", "foo/bar\\baz.js"),
        ];

        for (input, expected) in CASES {
            let result = super::unix_style(input);
            assert_eq!(
                result, expected,
                "\nunix_style({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn is_internal() {
        const CASES: [(&str, bool); 8] = [
            ("/foo/bar.js", true),
            ("./foo.js", true),
            ("../foo.js", true),
            ("C:/foo.js", true),
            ("C:\\foo.js", true),
            ("lodash", false),
            ("foo/bar.js", false),
            (".hidden", false),
        ];

        for (input, expected) in CASES {
            let result = super::is_internal(input);
            assert_eq!(
                result, expected,
                "\nis_internal({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn clean() {
        const CASES: [(&str, &str); 10] = [
            ("/foo/bar.js", "/foo/bar.js"),
            ("/foo/./bar.js", "/foo/bar.js"),
            ("/foo/../bar.js", "/bar.js"),
            ("/../foo.js", "/foo.js"),
            ("./foo.js", "foo.js"),
            ("../foo.js", "../foo.js"),
            ("foo//bar.js", "foo/bar.js"),
            ("foo/../../bar.js", "../bar.js"),
            (".", "."),
            ("", "."),
        ];

        for (input, expected) in CASES {
            let result = super::clean(input);
            assert_eq!(
                result, expected,
                "\nclean({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn dirname() {
        const CASES: [(&str, &str); 4] = [
            ("/foo/bar.js", "/foo"),
            ("/foo.js", "/"),
            ("foo/bar.js", "foo"),
            ("foo.js", "."),
        ];

        for (input, expected) in CASES {
            let result = super::dirname(input);
            assert_eq!(
                result, expected,
                "\ndirname({input:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn join() {
        const CASES: [(&str, &str, &str); 4] = [
            ("/foo", "./bar.js", "/foo/bar.js"),
            ("/foo", "../bar.js", "/bar.js"),
            ("/", "./bar.js", "/bar.js"),
            (".", "./bar.js", "bar.js"),
        ];

        for (base, relative, expected) in CASES {
            let result = super::join(base, relative);
            assert_eq!(
                result, expected,
                "\njoin({base:?}, {relative:?}) expected {expected:?} but received {result:?}"
            );
        }
    }

    #[test]
    fn relative_from() {
        const CASES: [(&str, &str, &str); 4] = [
            ("/foo", "/foo/bar.js", "bar.js"),
            ("/foo", "/foo/bar/baz.js", "bar/baz.js"),
            ("/foo/bar", "/foo/baz.js", "../baz.js"),
            ("/foo", "bar.js", "bar.js"),
        ];

        for (base, path, expected) in CASES {
            let result = super::relative_from(base, path);
            assert_eq!(
                result.to_str().unwrap(),
                expected,
                "\nrelative_from({base:?}, {path:?}) expected {expected:?} but received {result:?}"
            );
        }
    }
}
