/// Value assigned to every member when a factor does not vary across the set.
pub const DEGENERATE_NORMALIZED: f64 = 0.5;

/// Min-max normalize `values` into [0, 1].
///
/// Non-finite inputs are treated as 0. If all values are equal, every output is 0.5.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let clean = values.iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect::<Vec<_>>();

    let Some(min) = clean.iter().copied().reduce(f64::min) else { return Vec::new() };
    let max = clean.iter().copied().fold(min, f64::max);
    let range = max - min;

    if !(range > 0.0) || !range.is_finite() {
        return vec![DEGENERATE_NORMALIZED; clean.len()];
    }

    clean.iter().map(|&v| ((v - min) / range).clamp(0.0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_unit_interval() {
        assert_eq!(min_max(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn degenerate_set_is_one_half() {
        assert_eq!(min_max(&[7.0, 7.0, 7.0]), vec![0.5; 3]);
        assert_eq!(min_max(&[42.0]), vec![0.5]);
    }

    #[test]
    fn empty_stays_empty() {
        assert!(min_max(&[]).is_empty());
    }

    #[test]
    fn non_finite_values_count_as_zero() {
        assert_eq!(min_max(&[f64::NAN, 10.0, f64::INFINITY]), vec![0.0, 1.0, 0.0]);
    }
}
