//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the inclusive range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Truncate a value towards zero into an integer, or `None` if it is not finite or does not fit.
pub fn trunc_to_i64<T>(value: T) -> Option<i64>
where
    T: Float
{
    if !value.is_finite() {
        return None
    }

    value.trunc().to_i64()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&90f64, &0f64, &180f64), 90f64);
        assert_eq!(clamp(&-15f64, &0f64, &180f64), 0f64);
        assert_eq!(clamp(&195f64, &0f64, &180f64), 180f64);
        assert_eq!(clamp(&180f64, &0f64, &180f64), 180f64);
    }

    #[test]
    fn test_trunc_to_i64() {
        assert_eq!(trunc_to_i64(23.9f64), Some(23));
        assert_eq!(trunc_to_i64(-3.7f64), Some(-3));
        assert_eq!(trunc_to_i64(f64::NAN), None);
        assert_eq!(trunc_to_i64(f64::INFINITY), None);
    }
}
