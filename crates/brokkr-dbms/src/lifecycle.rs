//! DBMS lifecycle controller
//!
//! Inspects and mutates DBMS run status through the host provider. Both
//! operations are idempotent with respect to already-satisfied target states:
//! `ensure_running` on a started (or starting) instance issues no start call,
//! and `stop` tolerates already-stopped instances.

use crate::host::DbmsHost;
use brokkr_core::{DbmsHandle, DbmsStatus, HookEmitter, HookEvent, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Controller over a host's DBMS instances
pub struct LifecycleController {
    host: Arc<dyn DbmsHost>,
    hooks: HookEmitter,
}

impl LifecycleController {
    pub fn new(host: Arc<dyn DbmsHost>, hooks: HookEmitter) -> Self {
        Self { host, hooks }
    }

    /// Ensure a DBMS is running, starting it if currently stopped
    ///
    /// Returns the handle as last observed from the host. If the host's start
    /// operation fails the error propagates verbatim - no retry, and the
    /// status stays whatever the host last reported.
    pub async fn ensure_running(&self, dbms_id: &str) -> Result<DbmsHandle> {
        let handle = self.host.get(dbms_id).await?;

        match handle.status {
            DbmsStatus::Started | DbmsStatus::Starting => {
                debug!("{} is already {}, not re-issuing start", handle.name, handle.status);
                Ok(handle)
            }
            DbmsStatus::Stopping => {
                // The host owns this transition; report what we observed
                debug!("{} is stopping, returning last observed status", handle.name);
                Ok(handle)
            }
            DbmsStatus::Stopped => {
                info!("Starting DBMS {} ({})", handle.name, handle.id);
                self.host.start(dbms_id).await?;
                self.hooks.emit(HookEvent::DbmsStarted {
                    id: handle.id.clone(),
                    name: handle.name.clone(),
                });
                self.host.get(dbms_id).await
            }
        }
    }

    /// Stop the given DBMS instances, tolerating already-stopped ones
    pub async fn stop(&self, dbms_ids: &[String]) -> Result<Vec<DbmsHandle>> {
        let mut handles = Vec::with_capacity(dbms_ids.len());

        for dbms_id in dbms_ids {
            let handle = self.host.get(dbms_id).await?;

            if handle.status == DbmsStatus::Stopped {
                debug!("{} is already stopped", handle.name);
                handles.push(handle);
                continue;
            }

            info!("Stopping DBMS {} ({})", handle.name, handle.id);
            self.host.stop(dbms_id).await?;
            self.hooks.emit(HookEvent::DbmsStopped {
                id: handle.id.clone(),
                name: handle.name.clone(),
            });
            handles.push(self.host.get(dbms_id).await?);
        }

        Ok(handles)
    }
}
