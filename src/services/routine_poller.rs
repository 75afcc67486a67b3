use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::api::RoutineFeed;
use crate::models::RoutineEntry;
use crate::notify::{Notice, Notifier};

/// Latest routine snapshot. Whichever response lands last wins.
#[derive(Debug, Default, Clone)]
pub struct RoutineBoard {
    pub entries: Vec<RoutineEntry>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub type SharedBoard = Arc<RwLock<RoutineBoard>>;

/// ルーティンフィードの定期取得
/// 生きている間だけ動き、stop か drop で止まる
pub struct RoutinePoller {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl RoutinePoller {
    pub fn start(
        feed: Arc<dyn RoutineFeed>,
        board: SharedBoard,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        let (tx, mut rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            info!("Starting routine poller (interval: {:?})", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // 最初の tick は即時
                tokio::select! {
                    biased;
                    _ = &mut rx => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = &mut rx => break,
                    result = feed.fetch_routine() => result,
                };

                match result {
                    Ok(entries) => {
                        info!("Routine refreshed: {} sections", entries.len());
                        if let Ok(mut board) = board.write() {
                            board.entries = entries;
                            board.last_updated = Some(Utc::now());
                        }
                    }
                    Err(e) => {
                        // 失敗してもループは継続
                        warn!("Routine fetch failed: {}", e);
                        notifier.notify(Notice::error(e.user_message()));
                    }
                }
            }
            info!("Routine poller stopped");
        });

        Self {
            handle: Some(handle),
            shutdown: Some(tx),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RoutinePoller {
    fn drop(&mut self) {
        self.stop();
    }
}
