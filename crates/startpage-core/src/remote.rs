//! Remote account sync.
//!
//! The network client is an outside collaborator behind [`RemoteSync`];
//! [`CloudSync`] tracks status and routes downloads through the store's
//! import path, so a remote document is merged exactly like a file import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::BoxFuture;
use crate::bookmarks::Bookmark;
use crate::storage::SlotStorage;
use crate::store::{AppStore, ImportDocument, ImportError};
use crate::todos::Todo;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error("No data found in the remote account")]
    NoRemoteData,
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Downloaded configuration rejected: {0}")]
    Import(#[from] ImportError),
}

/// The record stored in the remote account. Parts may be missing when the
/// record was written by an older client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    #[serde(default)]
    pub bookmarks: Option<Vec<Bookmark>>,
    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
    #[serde(default)]
    pub todos: Option<Vec<Todo>>,
    pub updated_at: DateTime<Utc>,
}

impl SyncSnapshot {
    /// Capture the store's bookmarks, settings and todos.
    pub fn capture<S: SlotStorage>(
        store: &AppStore<S>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, SyncError> {
        let settings = match serde_json::to_value(store.settings())? {
            Value::Object(settings) => settings,
            _ => return Err(SyncError::Remote("settings are not an object".to_string())),
        };
        Ok(Self {
            bookmarks: Some(store.bookmarks().to_vec()),
            settings: Some(settings),
            todos: Some(store.todos().to_vec()),
            updated_at,
        })
    }

    /// The reduced import document this snapshot carries.
    pub fn to_document(&self) -> ImportDocument {
        ImportDocument {
            bookmarks: self.bookmarks.clone(),
            settings: self.settings.clone(),
            todos: self.todos.clone(),
        }
    }
}

/// Client for the remote account.
pub trait RemoteSync {
    fn is_signed_in(&self) -> bool;

    /// Create or replace the account's record.
    fn upload_snapshot(&self, snapshot: &SyncSnapshot) -> BoxFuture<'_, Result<(), SyncError>>;

    /// Fetch the account's record; `None` if there is none yet.
    fn download_snapshot(&self) -> BoxFuture<'_, Result<Option<SyncSnapshot>, SyncError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

/// Upload/download coordinator.
pub struct CloudSync<R: RemoteSync> {
    remote: R,
    status: SyncStatus,
    last_synced: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl<R: RemoteSync> CloudSync<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            status: SyncStatus::Idle,
            last_synced: None,
            last_error: None,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drop a `Success` status back to `Idle` once it has been shown.
    pub fn settle(&mut self) {
        if self.status == SyncStatus::Success {
            self.status = SyncStatus::Idle;
        }
    }

    /// Push the store's bookmarks, settings and todos to the account.
    pub async fn upload<S: SlotStorage>(&mut self, store: &AppStore<S>) -> Result<(), SyncError> {
        if !self.remote.is_signed_in() {
            return Err(SyncError::NotSignedIn);
        }
        self.begin();
        let now = Utc::now();
        let result = match SyncSnapshot::capture(store, now) {
            Ok(snapshot) => self.remote.upload_snapshot(&snapshot).await,
            Err(e) => Err(e),
        };
        self.finish(result.map(|()| now))
    }

    /// Pull the account's record and import it into the store.
    pub async fn download<S: SlotStorage>(
        &mut self,
        store: &mut AppStore<S>,
    ) -> Result<(), SyncError> {
        if !self.remote.is_signed_in() {
            return Err(SyncError::NotSignedIn);
        }
        self.begin();
        let result = match self.remote.download_snapshot().await {
            Ok(Some(snapshot)) => apply_snapshot(store, &snapshot).map(|()| snapshot.updated_at),
            Ok(None) => Err(SyncError::NoRemoteData),
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    fn begin(&mut self) {
        self.status = SyncStatus::Syncing;
        self.last_error = None;
    }

    fn finish(&mut self, result: Result<DateTime<Utc>, SyncError>) -> Result<(), SyncError> {
        match result {
            Ok(synced_at) => {
                log::info!("Sync finished at {}", synced_at.to_rfc3339());
                self.status = SyncStatus::Success;
                self.last_synced = Some(synced_at);
                Ok(())
            }
            Err(e) => {
                log::error!("Sync failed: {}", e);
                self.status = SyncStatus::Error;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

fn apply_snapshot<S: SlotStorage>(
    store: &mut AppStore<S>,
    snapshot: &SyncSnapshot,
) -> Result<(), SyncError> {
    let document = snapshot.to_document();
    if document.is_empty() {
        return Err(SyncError::Import(ImportError::WrongShape(
            "no bookmarks, settings or todos".to_string(),
        )));
    }
    store.import_document(&document)?;
    Ok(())
}
