//! Rent-roll editing support for front ends.

use crate::types::Money;

/// Resize a per-unit rent list to a new unit count without disturbing what
/// the user already entered: indices `0..min(old, new)` are preserved, growth
/// repeats the last known rent (or `fallback` when the list was empty), and
/// shrinking truncates from the end.
pub fn resize_unit_rents(rents: &[Money], new_count: usize, fallback: Money) -> Vec<Money> {
    let mut resized: Vec<Money> = rents.iter().take(new_count).copied().collect();
    let pad = rents.last().copied().unwrap_or(fallback);
    resized.resize(new_count, pad);
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grow_repeats_last_rent() {
        let rents = vec![dec!(1000), dec!(1200)];
        assert_eq!(
            resize_unit_rents(&rents, 4, dec!(900)),
            vec![dec!(1000), dec!(1200), dec!(1200), dec!(1200)]
        );
    }

    #[test]
    fn test_grow_from_empty_uses_fallback() {
        assert_eq!(
            resize_unit_rents(&[], 3, dec!(1500)),
            vec![dec!(1500), dec!(1500), dec!(1500)]
        );
    }

    #[test]
    fn test_shrink_preserves_prefix() {
        let rents = vec![dec!(1000), dec!(1200), dec!(900)];
        assert_eq!(
            resize_unit_rents(&rents, 2, dec!(0)),
            vec![dec!(1000), dec!(1200)]
        );
    }

    #[test]
    fn test_same_count_is_identity() {
        let rents = vec![dec!(1000), dec!(1200)];
        assert_eq!(resize_unit_rents(&rents, 2, dec!(0)), rents);
    }

    #[test]
    fn test_resize_to_zero() {
        let rents = vec![dec!(1000)];
        assert!(resize_unit_rents(&rents, 0, dec!(0)).is_empty());
    }
}
