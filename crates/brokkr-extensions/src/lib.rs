//! Extension management for Brokkr
//!
//! This crate handles:
//! - Registry manifest lookup and version resolution
//! - Streamed tarball download to a staging path
//! - Content-digest verification of staged artifacts
//! - Extraction and atomic relocation into the install directory
//!
//! The pipeline guarantees that nothing partial ever appears at a final
//! install path: the single rename in the relocation step is the commit
//! point, and every failure before it cleans the staging area.

pub mod download;
pub mod install;
pub mod registry;
pub mod verify;

pub use download::Downloader;
pub use install::ExtensionInstaller;
pub use registry::{RegistryClient, RegistryManifest};
