use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::api::SeatApi;
use crate::error::AppError;
use crate::models::{Session, WatchEntry, WatchForm};
use crate::notify::Confirm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Another submission was still in flight; nothing was sent.
    Skipped,
    /// The backend accepted the watch. The entry is present when it was echoed back.
    Created(Option<WatchEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted(String),
}

/// Clears the in-flight flag on every exit path.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct WatchListManager {
    api: Arc<dyn SeatApi>,
    watches: RwLock<Vec<WatchEntry>>,
    submitting: AtomicBool,
}

impl WatchListManager {
    pub fn new(api: Arc<dyn SeatApi>) -> Self {
        Self {
            api,
            watches: RwLock::new(Vec::new()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn watches(&self) -> Vec<WatchEntry> {
        self.watches.read().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// First entry's interval, used to seed the create form.
    pub fn seed_interval_minutes(&self) -> Option<u64> {
        self.watches
            .read()
            .ok()
            .and_then(|w| w.first().map(WatchEntry::interval_minutes))
    }

    /// Replaces the list with the server's view. On failure the old list stays.
    pub async fn list_watches(&self, session: &Session) -> Result<usize, AppError> {
        let fetched = self.api.fetch_watches(session).await.map_err(|e| {
            warn!("Failed to fetch watches for {}: {}", session.email, e);
            e
        })?;

        let count = fetched.len();
        if let Ok(mut watches) = self.watches.write() {
            *watches = fetched;
        }
        info!("Loaded {} watches for {}", count, session.email);
        Ok(count)
    }

    /// Submits the form. The form is cleared only when the backend accepts it.
    pub async fn add_watch(
        &self,
        session: &Session,
        form: &mut WatchForm,
    ) -> Result<AddOutcome, AppError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Submission already in flight, dropping");
            return Ok(AddOutcome::Skipped);
        }
        let _guard = SubmitGuard(&self.submitting);

        let req = form.to_request(&session.email)?;
        info!(
            "Adding watch {} section {} every {}ms",
            req.course_code, req.section, req.notify_interval_ms
        );

        let created = self.api.add_watch(session, &req).await.map_err(|e| {
            warn!("Failed to add watch {}: {}", req.course_code, e);
            e
        })?;

        form.clear();
        Ok(AddOutcome::Created(created))
    }

    /// Deletes after the user confirms; a cancelled prompt touches nothing.
    pub async fn delete_watch(
        &self,
        session: &Session,
        id: &str,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, AppError> {
        if !confirm
            .confirm("Are you sure?", "This action cannot be undone!")
            .await
        {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.api.delete_watch(session, id).await.map_err(|e| {
            warn!("Failed to delete watch {}: {}", id, e);
            e
        })?;

        if let Ok(mut watches) = self.watches.write() {
            watches.retain(|w| w.id != id);
        }
        info!("Deleted watch {}", id);
        Ok(DeleteOutcome::Deleted(id.to_string()))
    }
}
