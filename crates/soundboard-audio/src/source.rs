use std::path::{Path, PathBuf};

use crate::PlayerError;

const FILE_SCHEME: &str = "file://";

/// Resolves a clip source to a file path.
///
/// Absolute paths and `file://` sources are used as-is, relative paths are
/// joined onto `sounds_dir`. Any other scheme (`http://`, `blob:` and the
/// like) is rejected, since clips are only ever read from disk.
pub fn resolve_clip_path(sounds_dir: &Path, source: &str) -> Result<PathBuf, PlayerError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(PlayerError::EmptySource);
    }

    if let Some(path) = source.strip_prefix(FILE_SCHEME) {
        return Ok(PathBuf::from(path));
    }

    if has_scheme(source) {
        return Err(PlayerError::UnsupportedSource(source.to_string()));
    }

    let path = Path::new(source);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(sounds_dir.join(path))
    }
}

/// Whether the source starts with a URL scheme such as `https:`.
fn has_scheme(source: &str) -> bool {
    match source.split_once(':') {
        // single letters are drive prefixes on Windows, not schemes
        Some((scheme, _)) if scheme.len() > 1 => scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}
