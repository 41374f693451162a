pub mod state;
pub mod controls;
pub mod ground;
pub mod flight_model;

pub use controls::{ControlError, ControlState, Deflection};
pub use flight_model::{FlightModel, Forces};
pub use ground::{GroundContact, GroundPhase};
pub use state::{KinematicState, Orientation, SimConfig};
