use crate::vehicle::Airframe;

/// Component of weight opposing lift, m * g * cos(pitch).
///
/// The arcade model does not resolve forces into a body frame; weight is
/// simply scaled by the pitch attitude.
pub fn weight_component(airframe: &Airframe, pitch: f64) -> f64 {
    airframe.weight() * pitch.cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_weight_when_level() {
        let a = Airframe::default();
        assert!((weight_component(&a, 0.0) - 9810.0).abs() < 1e-9);
    }

    #[test]
    fn weight_component_shrinks_with_pitch() {
        let a = Airframe::default();
        assert!(weight_component(&a, 0.45) < weight_component(&a, 0.0));
        assert!((weight_component(&a, 0.3) - weight_component(&a, -0.3)).abs() < 1e-9);
    }
}
