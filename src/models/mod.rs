pub mod routine;
pub mod session;
pub mod watch;

pub use routine::{RoutineEntry, Schedule};
pub use session::{Navigation, Session, TokenClaims};
pub use watch::{NewWatchRequest, WatchEntry, WatchForm};
