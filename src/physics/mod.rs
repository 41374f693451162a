pub mod aerodynamics;
pub mod gravity;
