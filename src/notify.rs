use async_trait::async_trait;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message shown to the user (the "toast").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Blocking yes/no prompt in front of destructive actions.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, title: &str, text: &str) -> bool;
}

/// Prints notices to the terminal and mirrors them into the log.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                info!(notice = %notice.message, "success");
                println!("✓ {}", notice.message);
            }
            NoticeLevel::Error => {
                error!(notice = %notice.message, "error");
                eprintln!("✗ {}", notice.message);
            }
        }
    }
}
