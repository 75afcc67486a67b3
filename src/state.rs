use std::sync::Arc;

use crate::api::{RoutineFeed, SeatApi};
use crate::config::ClientConfig;
use crate::notify::{Confirm, Notifier};
use crate::storage::TokenStore;

#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub api: Arc<dyn SeatApi>,
    pub routine: Arc<dyn RoutineFeed>,
    pub tokens: Arc<dyn TokenStore>,
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn Confirm>,
}
