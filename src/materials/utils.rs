//! Helper functions for materials
//!
//! Math and utility functions that different materials can use.

use crate::math::Real;

/// Clamps `value` into `[min, max]`; returns the clamped value and how far
/// outside the range the input was (0 when inside).
#[inline]
pub fn clamp_with_overshoot(value: Real, min: Real, max: Real) -> (Real, Real) {
    if value > max {
        (max, value - max)
    } else if value < min {
        (min, min - value)
    } else {
        (value, 0.0)
    }
}

/// Physics parameter conversions
pub mod physics {
    use crate::math::Real;

    /// Computes the Lamé parameters (lambda, mu) from Young's modulus and Poisson ratio
    #[inline]
    pub fn lame_lambda_mu(young_modulus: Real, poisson_ratio: Real) -> (Real, Real) {
        let lambda =
            young_modulus * poisson_ratio / ((1.0 + poisson_ratio) * (1.0 - 2.0 * poisson_ratio));
        let mu = shear_modulus(young_modulus, poisson_ratio);
        (lambda, mu)
    }

    /// Shear modulus (mu) from Young's modulus and Poisson ratio
    #[inline]
    pub fn shear_modulus(young_modulus: Real, poisson_ratio: Real) -> Real {
        young_modulus / (2.0 * (1.0 + poisson_ratio))
    }

    /// Snow hardening factor `exp(hardening · (1 - Jp))`.
    #[inline]
    pub fn hardening_factor(hardening: Real, plastic_jacobian: Real) -> Real {
        (hardening * (1.0 - plastic_jacobian)).exp()
    }

    /// Tait-style pressure `bulk · (offset - J^-gamma)`.
    #[inline]
    pub fn tait_pressure(bulk_modulus: Real, jacobian: Real, gamma: Real, offset: Real) -> Real {
        bulk_modulus * (offset - jacobian.powf(-gamma))
    }
}

/// Check if material properties make sense
pub mod check {
    use crate::math::Real;

    #[inline]
    pub fn viscosity_ok(viscosity: Real) -> bool {
        viscosity >= 0.0 && viscosity.is_finite()
    }

    /// Check if Young's modulus is physically reasonable
    #[inline]
    pub fn young_modulus_ok(e: Real) -> bool {
        e > 0.0 && e < 1e12 && e.is_finite()
    }

    /// Check if Poisson ratio is in valid range
    #[inline]
    pub fn poisson_ratio_ok(nu: Real) -> bool {
        nu > -1.0 && nu < 0.5 && nu.is_finite()
    }

    /// Non-empty, finite interval.
    #[inline]
    pub fn range_ok(min: Real, max: Real) -> bool {
        min.is_finite() && max.is_finite() && min <= max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lame_parameters_for_snow_constants() {
        let (lambda, mu) = physics::lame_lambda_mu(1.0e4, 0.2);
        assert_relative_eq!(mu, 1.0e4 / 2.4, epsilon = 1.0e-9);
        assert_relative_eq!(lambda, 2000.0 / 0.72, epsilon = 1.0e-9);
    }

    #[test]
    fn overshoot_is_a_magnitude() {
        assert_eq!(clamp_with_overshoot(1.0, 0.9, 1.1), (1.0, 0.0));
        let (value, over) = clamp_with_overshoot(1.25, 0.9, 1.1);
        assert_eq!(value, 1.1);
        assert_relative_eq!(over, 0.15, epsilon = 1.0e-12);
        let (value, under) = clamp_with_overshoot(0.8, 0.9, 1.1);
        assert_eq!(value, 0.9);
        assert_relative_eq!(under, 0.1, epsilon = 1.0e-12);
    }

    #[test]
    fn parameter_checks() {
        assert!(check::poisson_ratio_ok(0.2));
        assert!(!check::poisson_ratio_ok(0.5));
        assert!(!check::young_modulus_ok(0.0));
        assert!(check::range_ok(0.9, 1.1));
        assert!(!check::range_ok(1.1, 0.9));
    }
}
