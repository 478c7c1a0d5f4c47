/// Convert a major-unit amount (e.g. rupees) into the gateway's minor unit (paise).
///
/// Prices are carried as `f64` through pricing; the gateway only accepts whole
/// minor units, so the product is rounded half away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(to_minor_units(4000.0), 400_000);
        assert_eq!(to_minor_units(99.99), 9_999);
        assert_eq!(to_minor_units(0.125), 13);
        assert_eq!(to_minor_units(0.0), 0);
    }
}
