//! Fire-and-forget lifecycle hook notifications
//!
//! Long-running pipeline steps (downloads, directory moves, DBMS
//! transitions) are bracketed by named events so an external progress UI can
//! follow along. Emitting is best-effort: with no listener attached it is a
//! no-op, and a listener can never fail or block the pipeline contract.

use std::sync::{Arc, RwLock};

/// Named lifecycle events emitted by the controllers and the install pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// Extension tarball transfer is starting
    ExtensionDownloadStart { name: String, version: String },
    /// Extension tarball transfer finished
    ExtensionDownloadStop { name: String, version: String },
    /// Extracted package is being moved into the install directory
    DirectoryMoveStart { description: String },
    /// Move into the install directory finished
    DirectoryMoveStop,
    /// A DBMS actually transitioned to started
    DbmsStarted { id: String, name: String },
    /// A DBMS actually transitioned to stopped
    DbmsStopped { id: String, name: String },
}

type Listener = Box<dyn Fn(&HookEvent) + Send + Sync>;

/// Cloneable registry of hook listeners
///
/// Clones share the same listener set, so a single emitter can be handed to
/// the lifecycle controller and the installer while the caller keeps
/// registering listeners on its own copy.
#[derive(Clone, Default)]
pub struct HookEmitter {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl HookEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all subsequent events
    pub fn on<F>(&self, listener: F)
    where
        F: Fn(&HookEvent) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Box::new(listener));
        }
    }

    /// Notify every registered listener; never fails
    pub fn emit(&self, event: HookEvent) {
        let Ok(listeners) = self.listeners.read() else {
            return;
        };
        if listeners.is_empty() {
            tracing::debug!("hook event with no listeners: {:?}", event);
            return;
        }
        for listener in listeners.iter() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for HookEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.listeners.read().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("HookEmitter").field("listeners", &count).finish()
    }
}
