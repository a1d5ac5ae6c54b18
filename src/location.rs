//! Locating and loading the game state file from disk

use crate::errors::{Error, ErrorKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name the game writes its settings to
pub const GAME_STATE_FILE: &str = "userGameState.cgs";

/// The location the game writes [`GAME_STATE_FILE`] to on this platform
///
/// Returns `None` when the environment variables that anchor the location
/// are not set.
pub fn default_path() -> Option<PathBuf> {
    default_path_from(|key| std::env::var_os(key))
}

fn default_path_from<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let non_empty = |key: &str| env(key).filter(|x| !x.is_empty()).map(PathBuf::from);

    let base = if cfg!(windows) {
        non_empty("LOCALAPPDATA")?
    } else if cfg!(target_os = "macos") {
        non_empty("HOME")?.join("Library").join("Application Support")
    } else {
        match non_empty("XDG_DATA_HOME").filter(|x| x.is_absolute()) {
            Some(x) => x,
            None => non_empty("HOME")?.join(".local").join("share"),
        }
    };

    Some(
        base.join("Colossal Order")
            .join("Cities_Skylines")
            .join(GAME_STATE_FILE),
    )
}

/// The explicitly given path, falling back to [`default_path`]
pub fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf, Error> {
    path.or_else(default_path)
        .ok_or_else(|| Error::from(ErrorKind::NoDefaultPath))
}

/// Reads the whole file into memory
///
/// A missing file is reported as [`ErrorKind::PathNotFound`] so that callers
/// can tell it apart from other io failures.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading game state");
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::from(ErrorKind::PathNotFound(path.to_path_buf())),
        _ => Error::from(e),
    })
}
