//! # brokkr-core
//!
//! Core library for Brokkr providing:
//! - Typed error taxonomy shared across all crates
//! - Data model for DBMS instances, credentials, and extensions
//! - Fire-and-forget lifecycle hook notifications
//! - Filesystem path conventions for the install tree

pub mod error;
pub mod hooks;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use hooks::{HookEmitter, HookEvent};
pub use types::{
    AccessCredential, DbmsHandle, DbmsStatus, Edition, ExtensionDescriptor, InstalledExtension,
    TokenScope,
};
