pub mod input;
pub mod warning;
pub mod session;
pub mod event;
pub mod runner;

pub use input::{Button, CameraMode, Command, CommandQueue, CommandSender};
pub use runner::{simulate, simulate_with, simulate_with_detectors, Flight, Pacing};
pub use session::Session;
pub use warning::{Warning, WarningEvaluator};
