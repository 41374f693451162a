pub mod pilot;
pub mod pid;
pub mod scripts;

pub use pid::Pid;
pub use pilot::Pilot;
pub use scripts::{by_name, names, CruisePilot, IdlePilot, TakeoffPilot};
