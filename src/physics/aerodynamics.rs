use crate::vehicle::Airframe;

/// Dynamic pressure q = 0.5 * rho * V^2.
pub fn dynamic_pressure(density: f64, speed: f64) -> f64 {
    0.5 * density * speed * speed
}

/// Lift magnitude: q * S * C_L * cos(aoa). Zero at rest, no division anywhere.
pub fn lift(airframe: &Airframe, speed: f64, aoa: f64) -> f64 {
    dynamic_pressure(airframe.air_density, speed) * airframe.wing_area * airframe.lift_coeff * aoa.cos()
}

/// Drag magnitude: q * S * C_D, plus any extra parasitic term (e.g. rudder).
pub fn drag(airframe: &Airframe, speed: f64, extra: f64) -> f64 {
    dynamic_pressure(airframe.air_density, speed) * airframe.wing_area * airframe.drag_coeff + extra
}

/// Engine thrust for a throttle setting in [0, 1].
pub fn thrust(airframe: &Airframe, throttle: f64) -> f64 {
    airframe.max_thrust * throttle
}
