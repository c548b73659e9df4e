use num_traits::Float;

/// Decimal places used when deciding whether a scale factor is the identity.
pub const SCALE_IDENTITY_DECIMAL_PLACES: i32 = 15;

/// Compares `a` and `b` to `decimal_places` significant decimal places,
/// relative to the magnitude of the larger operand.
///
/// NaN never compares equal; infinities compare equal only to themselves.
/// Operands of magnitude below one are compared absolutely, so
/// `almost_equal_in_decimal_places(1.0, 1.0 + 1e-16, 15)` holds while
/// `almost_equal_in_decimal_places(1.0, 1.0 + 1e-14, 15)` does not.
pub fn almost_equal_in_decimal_places<T: Float>(a: T, b: T, decimal_places: i32) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    if a == b {
        return true;
    }
    let ten = T::from(10.0).unwrap_or_else(T::one);
    let largest = a.abs().max(b.abs());
    let magnitude = if largest < T::one() {
        0
    } else {
        largest.log10().floor().to_i32().unwrap_or(0)
    };
    let tolerance = ten.powi(magnitude - decimal_places);
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_tolerance_is_fifteen_places() {
        assert!(almost_equal_in_decimal_places(1.0, 1.0, 15));
        assert!(almost_equal_in_decimal_places(1.0, 1.0 + 1e-16, 15));
        assert!(!almost_equal_in_decimal_places(1.0, 1.0 + 1e-14, 15));
        assert!(!almost_equal_in_decimal_places(1.0, 0.0, 15));
    }

    #[test]
    fn relative_to_magnitude() {
        assert!(almost_equal_in_decimal_places(1.0e6, 1.0e6 + 1.0e-10, 15));
        assert!(!almost_equal_in_decimal_places(1.0e6, 1.0e6 + 1.0e-8, 15));
        assert!(almost_equal_in_decimal_places(2.5f32, 2.5f32, 6));
    }

    #[test]
    fn non_finite_values() {
        assert!(!almost_equal_in_decimal_places(f64::NAN, f64::NAN, 15));
        assert!(almost_equal_in_decimal_places(f64::INFINITY, f64::INFINITY, 15));
        assert!(!almost_equal_in_decimal_places(f64::INFINITY, f64::MAX, 15));
    }
}
