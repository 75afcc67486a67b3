use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::NaiveTime;
use tracing::debug;

use crate::api::RoutineFeed;
use crate::models::{RoutineEntry, Schedule};
use crate::notify::Notifier;
use crate::services::routine_poller::{RoutineBoard, RoutinePoller, SharedBoard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    AddWatch,
    ListWatches,
    BrowseRoutine,
}

impl Tab {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "add" | "addwatch" => Some(Tab::AddWatch),
            "list" | "watches" | "listwatches" => Some(Tab::ListWatches),
            "routine" | "browse" | "browseroutine" => Some(Tab::BrowseRoutine),
            _ => None,
        }
    }
}

/// Owns the active tab and the routine browser. Polling runs only while
/// `BrowseRoutine` is the active tab.
pub struct ViewController {
    tab: Tab,
    search: String,
    board: SharedBoard,
    poller: Option<RoutinePoller>,
    feed: Arc<dyn RoutineFeed>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
}

impl ViewController {
    pub fn new(
        feed: Arc<dyn RoutineFeed>,
        notifier: Arc<dyn Notifier>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            tab: Tab::default(),
            search: String::new(),
            board: Arc::new(RwLock::new(RoutineBoard::default())),
            poller: None,
            feed,
            notifier,
            poll_interval,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(RoutinePoller::is_running)
    }

    /// Returns whether the tab actually changed.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if tab == self.tab {
            return false;
        }
        debug!("Switching tab {:?} -> {:?}", self.tab, tab);

        if self.tab == Tab::BrowseRoutine {
            if let Some(mut poller) = self.poller.take() {
                poller.stop();
            }
        }
        if tab == Tab::BrowseRoutine {
            self.poller = Some(RoutinePoller::start(
                self.feed.clone(),
                self.board.clone(),
                self.notifier.clone(),
                self.poll_interval,
            ));
        }

        self.tab = tab;
        true
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn board(&self) -> RoutineBoard {
        self.board.read().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn visible_routine(&self) -> Vec<RoutineEntry> {
        let board = self.board.read();
        match board {
            Ok(board) => filter_routine(&board.entries, &self.search),
            Err(_) => Vec::new(),
        }
    }
}

/// Case-insensitive substring match on course code. Empty term keeps everything.
pub fn filter_routine(entries: &[RoutineEntry], term: &str) -> Vec<RoutineEntry> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| e.matches_course(&needle))
        .cloned()
        .collect()
}

/// `"23:15"` -> `"11:15 PM"`. Times are shown as given, no timezone shift.
pub fn format_time_12h(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()?;
    Some(time.format("%-I:%M %p").to_string())
}

pub fn format_schedule(schedule: &Schedule) -> String {
    let start = format_time_12h(&schedule.start_time).unwrap_or_else(|| schedule.start_time.clone());
    let end = format_time_12h(&schedule.end_time).unwrap_or_else(|| schedule.end_time.clone());
    format!("{} {} - {}", schedule.day, start, end)
}
