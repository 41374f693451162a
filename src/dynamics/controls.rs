use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default throttle increment per button press.
pub const THROTTLE_STEP: f64 = 0.08;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("throttle delta must be finite, got {0}")]
    NonFiniteThrottle(f64),

    #[error("control deflection must be -1, 0 or 1, got {0}")]
    InvalidDeflection(i64),
}

// ---------------------------------------------------------------------------
// Discrete control-surface deflection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Deflection {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Deflection {
    pub fn sign(self) -> f64 {
        match self {
            Deflection::Negative => -1.0,
            Deflection::Neutral => 0.0,
            Deflection::Positive => 1.0,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Deflection::Neutral
    }
}

impl TryFrom<i64> for Deflection {
    type Error = ControlError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Deflection::Negative),
            0 => Ok(Deflection::Neutral),
            1 => Ok(Deflection::Positive),
            other => Err(ControlError::InvalidDeflection(other)),
        }
    }
}

impl From<Deflection> for i64 {
    fn from(d: Deflection) -> i64 {
        d.sign() as i64
    }
}

// ---------------------------------------------------------------------------
// Control state: stick, rudder, throttle
// ---------------------------------------------------------------------------

/// Control inputs as the pilot left them. Written by input commands between
/// ticks, read once per tick by the flight model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawControlState")]
pub struct ControlState {
    pub elevator: Deflection,
    pub aileron: Deflection,
    pub rudder: Deflection,
    throttle: f64, // [0, 1]
}

/// Wire form of `ControlState`; the throttle is checked on the way in.
#[derive(Deserialize)]
struct RawControlState {
    #[serde(default)]
    elevator: Deflection,
    #[serde(default)]
    aileron: Deflection,
    #[serde(default)]
    rudder: Deflection,
    throttle: f64,
}

impl TryFrom<RawControlState> for ControlState {
    type Error = ControlError;

    fn try_from(raw: RawControlState) -> Result<Self, Self::Error> {
        if !raw.throttle.is_finite() {
            return Err(ControlError::NonFiniteThrottle(raw.throttle));
        }
        Ok(Self {
            elevator: raw.elevator,
            aileron: raw.aileron,
            rudder: raw.rudder,
            throttle: raw.throttle.clamp(0.0, 1.0),
        })
    }
}

impl ControlState {
    pub fn with_throttle(throttle: f64) -> Self {
        let throttle = if throttle.is_finite() { throttle.clamp(0.0, 1.0) } else { 0.0 };
        Self { throttle, ..Self::default() }
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn set_elevator(&mut self, d: Deflection) {
        self.elevator = d;
    }

    pub fn set_aileron(&mut self, d: Deflection) {
        self.aileron = d;
    }

    pub fn set_rudder(&mut self, d: Deflection) {
        self.rudder = d;
    }

    pub fn clear_controls(&mut self) {
        self.elevator = Deflection::Neutral;
        self.aileron = Deflection::Neutral;
        self.rudder = Deflection::Neutral;
    }

    /// `throttle = clamp(throttle + delta, 0, 1)`. Returns the new throttle.
    pub fn adjust_throttle(&mut self, delta: f64) -> Result<f64, ControlError> {
        if !delta.is_finite() {
            return Err(ControlError::NonFiniteThrottle(delta));
        }
        self.throttle = (self.throttle + delta).clamp(0.0, 1.0);
        Ok(self.throttle)
    }

    pub fn throttle_up(&mut self) -> f64 {
        self.throttle = (self.throttle + THROTTLE_STEP).clamp(0.0, 1.0);
        self.throttle
    }

    pub fn throttle_down(&mut self) -> f64 {
        self.throttle = (self.throttle - THROTTLE_STEP).clamp(0.0, 1.0);
        self.throttle
    }
}
