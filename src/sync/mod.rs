pub mod scheduler;
pub mod status;
pub mod worker;

pub use scheduler::{PollerHandle, spawn_polling};
pub use status::{PollPhase, PollStatus};
