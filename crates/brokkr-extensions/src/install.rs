//! Extension install pipeline
//!
//! Orchestrates registry lookup, download, verification, extraction, and
//! atomic relocation into the installed-extensions directory:
//!
//! ```text
//! RESOLVING -> DOWNLOADING -> VERIFYING -> EXTRACTING -> RELOCATING -> INSTALLED
//! ```
//!
//! Every step can fail into an absorbing failed state; failed attempts remove
//! their staged archive and temporary extraction directory so nothing partial
//! is ever observable at a final install path. The single `rename` in the
//! relocation step is the commit point.
//!
//! Concurrent installs of the same `(name, version)` are rejected, not
//! serialized: an exclusive lock file keyed `name@version` is held from
//! download through relocation, and a contending caller fails fast with the
//! install-conflict error. Different packages install independently.

use crate::download::Downloader;
use crate::registry::RegistryClient;
use crate::verify;
use brokkr_core::paths;
use brokkr_core::{Error, ExtensionDescriptor, HookEmitter, HookEvent, InstalledExtension, Result};
use flate2::read::GzDecoder;
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info, warn};

/// Orchestrator for extension installs under one install directory
pub struct ExtensionInstaller {
    registry: RegistryClient,
    downloader: Downloader,
    install_dir: PathBuf,
    hooks: HookEmitter,
}

impl ExtensionInstaller {
    pub fn new(registry_base: &str, install_dir: PathBuf, hooks: HookEmitter) -> Result<Self> {
        Ok(Self {
            registry: RegistryClient::new(registry_base)?,
            downloader: Downloader::new()?,
            install_dir,
            hooks,
        })
    }

    /// Installer over the default `~/.brokkr/extensions` directory
    pub fn with_default_dir(registry_base: &str, hooks: HookEmitter) -> Result<Self> {
        let install_dir = paths::default_extensions_dir()?;
        Self::new(registry_base, install_dir, hooks)
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Install `name@version`, returning the committed descriptor
    ///
    /// `version` may be the `latest` dist-tag. Reinstalling an already
    /// installed `(name, version)` overwrites the prior install.
    pub async fn install(&self, name: &str, version: &str) -> Result<InstalledExtension> {
        let descriptor = self.registry.resolve(name, version).await?;

        let staging = paths::staging_dir(&self.install_dir);
        fs::create_dir_all(&staging)?;

        let _lock = InstallLock::acquire(&staging, &descriptor.name, &descriptor.version)?;

        let key = format!("{}@{}", descriptor.name, descriptor.version);
        let staged_archive = staging.join(format!("{}.tgz", key));
        let extract_dir = staging.join(format!("{}.tmp", key));

        let result = self
            .run_pipeline(&descriptor, &staged_archive, &extract_dir)
            .await;

        if result.is_err() {
            // A failed attempt leaves no staged artifacts behind
            let _ = fs::remove_file(&staged_archive);
            let _ = fs::remove_dir_all(&extract_dir);
        }

        result
    }

    async fn run_pipeline(
        &self,
        descriptor: &ExtensionDescriptor,
        staged_archive: &Path,
        extract_dir: &Path,
    ) -> Result<InstalledExtension> {
        // DOWNLOADING
        self.hooks.emit(HookEvent::ExtensionDownloadStart {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
        });
        let bytes = self
            .downloader
            .download(&descriptor.tarball_url, staged_archive)
            .await?;
        self.hooks.emit(HookEvent::ExtensionDownloadStop {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
        });
        debug!(
            "staged {} bytes for {}@{}",
            bytes, descriptor.name, descriptor.version
        );

        // VERIFYING
        verify::verify_digest(staged_archive, &descriptor.expected_digest)?;

        // EXTRACTING - into a .tmp directory, never the final path
        if extract_dir.exists() {
            // Stale leftover from an interrupted earlier attempt
            fs::remove_dir_all(extract_dir)?;
        }
        fs::create_dir_all(extract_dir)?;
        let tar_gz = File::open(staged_archive)?;
        let tar = GzDecoder::new(tar_gz);
        let mut archive = Archive::new(tar);
        archive.unpack(extract_dir)?;
        let package_root = package_root(extract_dir)?;

        // RELOCATING - the rename is the commit point
        let destination = self
            .install_dir
            .join(format!("{}@{}", descriptor.name, descriptor.version));
        self.hooks.emit(HookEvent::DirectoryMoveStart {
            description: format!("moving {} to data directory", descriptor.name),
        });
        if destination.exists() {
            fs::remove_dir_all(&destination)?;
        }
        fs::rename(&package_root, &destination)?;

        // Post-commit cleanup of the staging area is best-effort
        if extract_dir.exists() {
            if let Err(err) = fs::remove_dir_all(extract_dir) {
                warn!("failed to remove extraction dir {}: {}", extract_dir.display(), err);
            }
        }
        if let Err(err) = fs::remove_file(staged_archive) {
            warn!("failed to remove staged archive {}: {}", staged_archive.display(), err);
        }
        self.hooks.emit(HookEvent::DirectoryMoveStop);

        info!(
            "Installed {}@{} to {}",
            descriptor.name,
            descriptor.version,
            destination.display()
        );
        Ok(InstalledExtension {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            install_path: destination,
        })
    }

    /// Remove an installed extension
    pub async fn uninstall(&self, name: &str, version: &str) -> Result<()> {
        let destination = self.install_dir.join(format!("{}@{}", name, version));
        if !destination.exists() {
            return Err(Error::not_found(format!(
                "{}@{} is not installed",
                name, version
            )));
        }

        let staging = paths::staging_dir(&self.install_dir);
        fs::create_dir_all(&staging)?;
        let _lock = InstallLock::acquire(&staging, name, version)?;

        fs::remove_dir_all(&destination)?;
        info!("Uninstalled {}@{}", name, version);
        Ok(())
    }

    /// List committed installs by scanning the install directory
    ///
    /// The directory tree is the only source of truth: anything named
    /// `name@version` directly under the root counts as installed.
    pub fn installed(&self) -> Result<Vec<InstalledExtension>> {
        let mut installed = Vec::new();
        if !self.install_dir.exists() {
            return Ok(installed);
        }

        for entry in fs::read_dir(&self.install_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name();
            let Some(dir_name) = dir_name.to_str() else {
                continue;
            };
            if dir_name == paths::STAGING_DIR_NAME {
                continue;
            }
            let Some((name, version)) = dir_name.rsplit_once('@') else {
                continue;
            };
            installed.push(InstalledExtension {
                name: name.to_string(),
                version: version.to_string(),
                install_path: entry.path(),
            });
        }

        installed.sort_by(|a, b| a.dir_name().cmp(&b.dir_name()));
        Ok(installed)
    }
}

/// Exclusive per-`name@version` lock held for the mutating pipeline steps
///
/// Backed by a lock file in the staging directory so the exclusion also holds
/// across processes. Released when dropped; the lock file itself stays
/// behind, which is harmless.
#[derive(Debug)]
struct InstallLock {
    file: File,
}

impl InstallLock {
    fn acquire(staging: &Path, name: &str, version: &str) -> Result<Self> {
        let lock_path = staging.join(format!("{}@{}.lock", name, version));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        if !file.try_lock_exclusive()? {
            return Err(Error::install_conflict(name, version));
        }

        debug!("acquired install lock {}", lock_path.display());
        Ok(Self { file })
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            warn!("failed to release install lock: {}", err);
        }
    }
}

/// Locate the package root inside an extraction directory
///
/// npm-style tarballs wrap their contents in a single top-level directory
/// (`package/`); when that is the shape, the inner directory is the root.
fn package_root(extract_dir: &Path) -> Result<PathBuf> {
    let entries: Vec<_> = fs::read_dir(extract_dir)?.collect::<std::io::Result<Vec<_>>>()?;

    if entries.len() == 1 && entries[0].file_type()?.is_dir() {
        return Ok(entries[0].path());
    }
    Ok(extract_dir.to_path_buf())
}
