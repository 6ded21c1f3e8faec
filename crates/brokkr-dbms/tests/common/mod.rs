//! Shared test doubles for the host-side collaborators

// Not every test binary exercises every double
#![allow(dead_code)]

use async_trait::async_trait;
use brokkr_dbms::{DbmsHost, SecretPrompt, TokenIssuer};
use brokkr_core::{DbmsHandle, DbmsStatus, Edition, Error, Result, TokenScope};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory DBMS host that counts start/stop calls
pub struct MockHost {
    handles: Mutex<HashMap<String, DbmsHandle>>,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    fail_start: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            fail_start: false,
        }
    }

    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    pub fn with_dbms(self, id: &str, name: &str, edition: Edition, status: DbmsStatus) -> Self {
        self.handles.lock().unwrap().insert(
            id.to_string(),
            DbmsHandle {
                id: id.to_string(),
                name: name.to_string(),
                edition,
                status,
            },
        );
        self
    }

    pub fn status_of(&self, id: &str) -> DbmsStatus {
        self.handles.lock().unwrap().get(id).unwrap().status
    }
}

#[async_trait]
impl DbmsHost for MockHost {
    async fn get(&self, dbms_id: &str) -> Result<DbmsHandle> {
        self.handles
            .lock()
            .unwrap()
            .get(dbms_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("No DBMS with id {}", dbms_id)))
    }

    async fn start(&self, dbms_id: &str) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(Error::Io(std::io::Error::other(
                "host refused to start the instance",
            )));
        }
        let mut handles = self.handles.lock().unwrap();
        let handle = handles
            .get_mut(dbms_id)
            .ok_or_else(|| Error::not_found(format!("No DBMS with id {}", dbms_id)))?;
        handle.status = DbmsStatus::Started;
        Ok(())
    }

    async fn stop(&self, dbms_id: &str) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        let mut handles = self.handles.lock().unwrap();
        let handle = handles
            .get_mut(dbms_id)
            .ok_or_else(|| Error::not_found(format!("No DBMS with id {}", dbms_id)))?;
        handle.status = DbmsStatus::Stopped;
        Ok(())
    }
}

/// Token issuer double returning a fixed token, or refusing
pub struct MockIssuer {
    token: Option<String>,
    pub calls: AtomicUsize,
}

impl MockIssuer {
    pub fn returning(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TokenIssuer for MockIssuer {
    async fn issue_token(&self, scope: &TokenScope) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.token {
            Some(token) => Ok(format!("{}:{}", token, scope.dbms_id)),
            None => Err(Error::fetch("connection refused by issuer")),
        }
    }
}

/// Prompt double returning a fixed secret
pub struct MockPrompt {
    secret: String,
    pub calls: AtomicUsize,
}

impl MockPrompt {
    pub fn returning(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SecretPrompt for MockPrompt {
    async fn ask_secret(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.secret.clone())
    }
}
