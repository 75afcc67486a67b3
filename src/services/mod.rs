pub mod home;
pub mod login;
pub mod routine_poller;
pub mod session_guard;
pub mod view;
pub mod watch_list;

pub use home::HomeController;
pub use login::{LoginFlow, LoginStep};
pub use routine_poller::{RoutineBoard, RoutinePoller};
pub use session_guard::SessionGuard;
pub use view::{Tab, ViewController};
pub use watch_list::{AddOutcome, DeleteOutcome, WatchListManager};
