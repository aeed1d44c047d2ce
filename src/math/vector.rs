use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Vector helpers used by the attitude estimator
// ---------------------------------------------------------------------------

/// Projection of `a` onto `b`: (a·b / |b|²) b.
/// A zero-length `b` projects to the zero vector.
pub fn projection(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let len_sq = b.norm_squared();
    if len_sq == 0.0 {
        return Vector3::zeros();
    }
    b * (a.dot(b) / len_sq)
}

/// -1 if `a` and `b` point into opposite half-spaces (negative dot), else +1.
pub fn direction_sign(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    if a.dot(b) < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Unsigned angle between two vectors (rad), in [0, π].
/// Zero-length inputs yield 0 instead of NaN.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    if a.norm_squared() == 0.0 || b.norm_squared() == 0.0 {
        return 0.0;
    }
    let cos = a.dot(b) / a.norm() / b.norm();
    cos.clamp(-1.0, 1.0).acos()
}

/// Clamp that never panics: `lo` wins over the input, `hi` wins over `lo`.
/// NaN inputs collapse to `lo`.
pub fn soft_clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn projection_onto_axis() {
        let a = Vector3::new(3.0, 4.0, 5.0);
        let p = projection(&a, &Vector3::new(0.0, 2.0, 0.0));
        assert!((p - Vector3::new(0.0, 4.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn projection_onto_zero_is_zero() {
        let p = projection(&Vector3::new(1.0, 1.0, 1.0), &Vector3::zeros());
        assert_eq!(p, Vector3::zeros());
    }

    #[test]
    fn direction_sign_is_never_zero() {
        let x = Vector3::x();
        assert_eq!(direction_sign(&x, &x), 1.0);
        assert_eq!(direction_sign(&x, &-x), -1.0);
        // Orthogonal counts as same side
        assert_eq!(direction_sign(&x, &Vector3::y()), 1.0);
    }

    #[test]
    fn angle_between_is_symmetric() {
        let a = Vector3::new(1.0, 2.0, -0.5);
        let b = Vector3::new(-3.0, 0.2, 4.0);
        assert!((angle_between(&a, &b) - angle_between(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn angle_between_known_values() {
        let x = Vector3::x();
        assert!((angle_between(&x, &Vector3::y()) - FRAC_PI_2).abs() < 1e-12);
        assert!((angle_between(&x, &-x) - PI).abs() < 1e-12);
        assert_eq!(angle_between(&x, &(x * 5.0)), 0.0);
    }

    #[test]
    fn angle_between_degenerate_is_zero() {
        assert_eq!(angle_between(&Vector3::zeros(), &Vector3::x()), 0.0);
        assert_eq!(angle_between(&Vector3::y(), &Vector3::zeros()), 0.0);
    }

    #[test]
    fn soft_clamp_inverted_bounds_does_not_panic() {
        assert_eq!(soft_clamp(0.5, 0.01, 0.15), 0.15);
        assert_eq!(soft_clamp(-2.0, 0.01, 0.15), 0.01);
        assert_eq!(soft_clamp(0.5, 0.3, 0.1), 0.1);
        assert_eq!(soft_clamp(f64::NAN, 0.01, 0.15), 0.01);
    }
}
