//! DBMS management for Brokkr
//!
//! This crate handles:
//! - DBMS run-status inspection and start/stop (lifecycle controller)
//! - Access-credential acquisition per edition (token broker)
//! - The single-shot OAuth redirect capture server
//!
//! The host environment that actually owns the DBMS processes, the trusted
//! token issuer, and the interactive prompt surface are all external
//! collaborators, injected through the traits in [`host`].

pub mod broker;
pub mod capture;
pub mod host;
pub mod lifecycle;

pub use broker::{AccessTokenBroker, CaptureSettings};
pub use capture::CaptureSession;
pub use host::{DbmsHost, SecretPrompt, TokenIssuer};
pub use lifecycle::LifecycleController;
