//! Filesystem conventions for the extensions install tree
//!
//! Layout under the install root:
//!
//! ```text
//! ~/.brokkr/extensions/
//!     .staging/              staged archives, .tmp extraction dirs, locks
//!     <name>@<version>/      committed installs
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory name for in-flight install artifacts under the root
pub const STAGING_DIR_NAME: &str = ".staging";

/// Default extensions install root, `~/.brokkr/extensions`
pub fn default_extensions_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::not_supported("Unable to determine home directory for extensions root")
    })?;
    Ok(home.join(".brokkr").join("extensions"))
}

/// Staging directory for a given install root
pub fn staging_dir(root: &Path) -> PathBuf {
    root.join(STAGING_DIR_NAME)
}
