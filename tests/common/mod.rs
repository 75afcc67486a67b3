#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::StatusCode;
use tokio::sync::Notify;

use notifyseat::api::dto::{SendOtpResponse, VerifyOtpResponse};
use notifyseat::api::{RoutineFeed, SeatApi};
use notifyseat::config::ClientConfig;
use notifyseat::error::AppError;
use notifyseat::models::{NewWatchRequest, RoutineEntry, Schedule, Session, WatchEntry, WatchForm};
use notifyseat::notify::{Confirm, Notice, Notifier};
use notifyseat::state::AppState;
use notifyseat::storage::{MemoryTokenStore, TokenStore};

pub const EMAIL: &str = "student@g.bracu.ac.bd";

pub fn make_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn valid_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    make_token(serde_json::json!({ "email": EMAIL, "exp": exp }))
}

pub fn session() -> Session {
    Session {
        token: valid_token(),
        email: EMAIL.to_string(),
    }
}

pub fn watch(id: &str, course: &str, section: &str, interval_ms: u64) -> WatchEntry {
    WatchEntry {
        id: id.to_string(),
        owner_email: EMAIL.to_string(),
        student_name: "Rahim".to_string(),
        course_code: course.to_string(),
        section: section.to_string(),
        notify_interval_ms: interval_ms,
    }
}

pub fn filled_form() -> WatchForm {
    WatchForm {
        student_name: "Rahim".to_string(),
        course_code: "cse220".to_string(),
        section: "5".to_string(),
        interval_minutes: 10.0,
    }
}

fn server_error() -> AppError {
    AppError::Api {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Server error".to_string(),
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub watches: Mutex<Vec<WatchEntry>>,
    pub added: Mutex<Vec<NewWatchRequest>>,
    pub fetch_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_delete: AtomicBool,
    pub otp_message: Mutex<Option<String>>,
    pub verify_token: Mutex<Option<String>>,
    hold_adds: AtomicBool,
    release: Notify,
}

impl FakeApi {
    pub fn with_watches(watches: Vec<WatchEntry>) -> Self {
        let api = Self::default();
        *api.watches.lock().unwrap() = watches;
        api
    }

    /// Parks every add_watch call until `release_adds`.
    pub fn hold_adds(&self) {
        self.hold_adds.store(true, Ordering::SeqCst);
    }

    pub fn release_adds(&self) {
        self.hold_adds.store(false, Ordering::SeqCst);
        self.release.notify_waiters();
        self.release.notify_one();
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn adds(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeatApi for FakeApi {
    async fn send_otp(&self, _email: &str) -> Result<SendOtpResponse, AppError> {
        match self.otp_message.lock().unwrap().clone() {
            Some(message) => Ok(serde_json::from_value(serde_json::json!({ "message": message }))
                .expect("send-otp body")),
            None => Err(server_error()),
        }
    }

    async fn verify_otp(&self, _email: &str, otp: &str) -> Result<VerifyOtpResponse, AppError> {
        if otp != "123456" {
            return Ok(serde_json::from_value(serde_json::json!({ "message": "Invalid OTP" }))
                .expect("verify-otp body"));
        }
        let token = self.verify_token.lock().unwrap().clone();
        Ok(serde_json::from_value(serde_json::json!({
            "message": "OTP verified successfully",
            "token": token,
        }))
        .expect("verify-otp body"))
    }

    async fn fetch_watches(&self, _session: &Session) -> Result<Vec<WatchEntry>, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self.watches.lock().unwrap().clone())
    }

    async fn add_watch(
        &self,
        _session: &Session,
        req: &NewWatchRequest,
    ) -> Result<Option<WatchEntry>, AppError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_adds.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(server_error());
        }

        let mut watches = self.watches.lock().unwrap();
        let entry = WatchEntry {
            id: format!("w{}", watches.len() + 1),
            owner_email: req.owner_email.clone(),
            student_name: req.student_name.clone(),
            course_code: req.course_code.clone(),
            section: req.section.clone(),
            notify_interval_ms: req.notify_interval_ms,
        };
        watches.push(entry.clone());
        self.added.lock().unwrap().push(req.clone());
        Ok(Some(entry))
    }

    async fn delete_watch(&self, _session: &Session, id: &str) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.watches.lock().unwrap().retain(|w| w.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFeed {
    pub entries: Mutex<Vec<RoutineEntry>>,
    pub fetch_calls: AtomicUsize,
}

impl FakeFeed {
    pub fn new(entries: Vec<RoutineEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutineFeed for FakeFeed {
    async fn fetch_routine(&self) -> Result<Vec<RoutineEntry>, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().clone())
    }
}

pub fn routine(course: &str, section: &str, capacity: u32, consumed: u32) -> RoutineEntry {
    RoutineEntry {
        section_id: serde_json::json!(format!("{}-{}", course, section)),
        section_name: section.to_string(),
        course_code: course.to_string(),
        faculties: Some("ABC".to_string()),
        class_schedules: vec![Schedule {
            day: "SUNDAY".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:20".to_string(),
        }],
        lab_schedules: Vec::new(),
        capacity,
        consumed_seat: consumed,
    }
}

pub fn sample_routine() -> Vec<RoutineEntry> {
    vec![
        routine("CSE220", "01", 40, 40),
        routine("MAT216", "03", 35, 20),
        routine("CSE421", "02", 30, 12),
    ]
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct FixedConfirm {
    pub answer: bool,
    pub asked: AtomicUsize,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Confirm for FixedConfirm {
    async fn confirm(&self, _title: &str, _text: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Hands out a fixed token but cannot write or delete it.
pub struct ReadOnlyTokenStore {
    pub token: Option<String>,
    pub remove_calls: AtomicUsize,
}

impl ReadOnlyTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            remove_calls: AtomicUsize::new(0),
        }
    }
}

fn read_only() -> AppError {
    AppError::Storage(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "read-only file system",
    ))
}

#[async_trait]
impl TokenStore for ReadOnlyTokenStore {
    async fn load(&self) -> Result<Option<String>, AppError> {
        Ok(self.token.clone())
    }

    async fn save(&self, _token: &str) -> Result<(), AppError> {
        Err(read_only())
    }

    async fn remove(&self) -> Result<(), AppError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        Err(read_only())
    }
}

pub struct Harness {
    pub state: AppState,
    pub api: Arc<FakeApi>,
    pub feed: Arc<FakeFeed>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirm: Arc<FixedConfirm>,
}

pub fn harness(api: FakeApi, token: Option<String>, confirm: bool) -> Harness {
    let api = Arc::new(api);
    let feed = Arc::new(FakeFeed::new(sample_routine()));
    let tokens = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let confirm = Arc::new(FixedConfirm::new(confirm));

    let config = ClientConfig {
        routine_poll_interval: Duration::from_secs(60),
        ..ClientConfig::default()
    };

    let state = AppState {
        config,
        api: api.clone(),
        routine: feed.clone(),
        tokens: tokens.clone(),
        notifier: notifier.clone(),
        confirm: confirm.clone(),
    };

    Harness {
        state,
        api,
        feed,
        tokens,
        notifier,
        confirm,
    }
}
