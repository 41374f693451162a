pub mod variant;
pub mod loader;

pub use variant::{presets, Airframe, GroundRoll, InitialConditions, StallRule, VariantBuilder, VariantConfig};
pub use loader::{load_variant, ConfigError};
