use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only at the geometry/battery boundary.
///
/// Saturates: values past the Q32.32 range (infinities included) become
/// `Fixed64::MIN`/`MAX`, and NaN becomes zero.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    if v.is_nan() {
        Fixed64::ZERO
    } else {
        Fixed64::saturating_from_num(v)
    }
}

/// Convert Fixed64 to f64. Use only for display and geometry.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Battery level of a fully charged robot, in percent.
#[inline]
pub fn full_charge() -> Fixed64 {
    Fixed64::from_num(100)
}

/// Clamp a battery level into `[0, 100]`.
#[inline]
pub fn clamp_percent(v: Fixed64) -> Fixed64 {
    v.clamp(Fixed64::ZERO, full_charge())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn conversion_saturates_instead_of_panicking() {
        assert_eq!(f64_to_fixed64(f64::NAN), Fixed64::ZERO);
        assert_eq!(f64_to_fixed64(f64::INFINITY), Fixed64::MAX);
        assert_eq!(f64_to_fixed64(f64::NEG_INFINITY), Fixed64::MIN);
        assert_eq!(f64_to_fixed64(1e12), Fixed64::MAX);
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(f64_to_fixed64(105.0)), full_charge());
        assert_eq!(clamp_percent(f64_to_fixed64(-3.0)), Fixed64::ZERO);
        assert_eq!(clamp_percent(f64_to_fixed64(42.5)), f64_to_fixed64(42.5));
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(1.0 / 3.0);
        assert_eq!(a, b);
        assert_eq!(a * f64_to_fixed64(3.0), b * f64_to_fixed64(3.0));
    }
}
