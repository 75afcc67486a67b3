use tracing::info;

use crate::error::AppError;
use crate::models::{Navigation, RoutineEntry, Session, WatchEntry, WatchForm};
use crate::notify::Notice;
use crate::services::session_guard::SessionGuard;
use crate::services::view::{Tab, ViewController};
use crate::services::watch_list::{AddOutcome, DeleteOutcome, WatchListManager};
use crate::state::AppState;

/// The home page: session, watch list and view state in one place. Mutations
/// report an outcome and this controller decides when to refetch.
pub struct HomeController {
    state: AppState,
    guard: SessionGuard,
    session: Session,
    watches: WatchListManager,
    view: ViewController,
    form: WatchForm,
}

impl HomeController {
    /// Fails with a login-requiring error when there is no usable token.
    pub async fn load(state: AppState) -> Result<Self, AppError> {
        let guard = SessionGuard::new(state.tokens.clone());
        let session = match guard.establish().await {
            Ok(session) => session,
            Err(e) => {
                state.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        let watches = WatchListManager::new(state.api.clone());
        let view = ViewController::new(
            state.routine.clone(),
            state.notifier.clone(),
            state.config.routine_poll_interval,
        );

        let mut home = Self {
            state,
            guard,
            session,
            watches,
            view,
            form: WatchForm::default(),
        };
        home.refresh().await;
        Ok(home)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn watches(&self) -> Vec<WatchEntry> {
        self.watches.watches()
    }

    pub fn is_submitting(&self) -> bool {
        self.watches.is_submitting()
    }

    pub fn form(&self) -> &WatchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut WatchForm {
        &mut self.form
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn tab(&self) -> Tab {
        self.view.tab()
    }

    pub fn select_tab(&mut self, tab: Tab) -> bool {
        self.view.select_tab(tab)
    }

    pub fn set_search(&mut self, term: &str) {
        self.view.set_search(term);
    }

    pub fn visible_routine(&self) -> Vec<RoutineEntry> {
        self.view.visible_routine()
    }

    /// Reloads the watch list; returns false when the fetch failed.
    pub async fn refresh(&mut self) -> bool {
        match self.watches.list_watches(&self.session).await {
            Ok(_) => {
                if self.form == WatchForm::default() {
                    if let Some(minutes) = self.watches.seed_interval_minutes() {
                        self.form.interval_minutes = minutes as f64;
                    }
                }
                true
            }
            Err(e) => {
                self.state.notifier.notify(Notice::error(e.user_message()));
                false
            }
        }
    }

    pub async fn submit_watch(&mut self) -> Result<AddOutcome, AppError> {
        let outcome = match self.watches.add_watch(&self.session, &mut self.form).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        if let AddOutcome::Created(_) = outcome {
            self.state
                .notifier
                .notify(Notice::success("Course added successfully!"));
            self.refresh().await;
        }
        Ok(outcome)
    }

    pub async fn delete_watch(&mut self, id: &str) -> Result<DeleteOutcome, AppError> {
        let confirm = self.state.confirm.clone();
        match self
            .watches
            .delete_watch(&self.session, id, confirm.as_ref())
            .await
        {
            Ok(outcome) => {
                if let DeleteOutcome::Deleted(_) = outcome {
                    self.state
                        .notifier
                        .notify(Notice::success("Course deleted successfully!"));
                }
                Ok(outcome)
            }
            Err(e) => {
                self.state
                    .notifier
                    .notify(Notice::error("Failed to delete course."));
                Err(e)
            }
        }
    }

    /// Clears the token and stops polling. The controller is gone afterwards.
    /// On failure the session stays as it was and the error is shown.
    pub async fn logout(&mut self) -> Result<Navigation, AppError> {
        let nav = match self.guard.end().await {
            Ok(nav) => nav,
            Err(e) => {
                self.state.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };
        self.view.select_tab(Tab::AddWatch);
        info!("{} logged out", self.session.email);
        self.state
            .notifier
            .notify(Notice::success("Logged out successfully"));
        Ok(nav)
    }
}
