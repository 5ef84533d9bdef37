#[inline]
pub(crate) fn magnitude2d(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

#[inline]
pub(crate) fn normalize_after_deadzone(mag: f32, deadzone: f32) -> f32 {
    if mag <= deadzone {
        0.0
    } else {
        ((mag - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0)
    }
}

#[inline]
pub(crate) fn apply_gamma(base: f32, gamma: f32) -> f32 {
    let g = gamma.max(0.1);
    if (g - 1.0).abs() < 1e-6 {
        base
    } else if (g - 2.0).abs() < 1e-6 {
        base * base
    } else if (g - 1.5).abs() < 1e-6 {
        base * base.sqrt()
    } else {
        base.powf(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_deadzone_edge_to_zero_and_full_to_one() {
        assert_eq!(normalize_after_deadzone(0.2, 0.25), 0.0);
        assert_eq!(normalize_after_deadzone(0.25, 0.25), 0.0);
        assert!((normalize_after_deadzone(1.0, 0.25) - 1.0).abs() < 1e-6);
        assert!((normalize_after_deadzone(0.625, 0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gamma_shapes_midpoint() {
        assert!((apply_gamma(0.5, 1.0) - 0.5).abs() < 1e-6);
        assert!((apply_gamma(0.5, 2.0) - 0.25).abs() < 1e-6);
        assert!((apply_gamma(0.5, 3.0) - 0.125).abs() < 1e-6);
    }
}
