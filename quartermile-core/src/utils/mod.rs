//! Module containing miscellaneous utility functions.

use crate::imports::*;

pub mod interp;

/// Index of the first element of `arr` at or above `cut`
pub fn first_geq(arr: &[f64], cut: f64) -> Option<usize> {
    arr.iter().position(|&x| x >= cut)
}

/// Largest element of `arr`, NaN if empty
pub fn ndarrmax(arr: &Array1<f64>) -> f64 {
    arr.iter().copied().fold(f64::NAN, f64::max)
}

/// True if every element is greater than or equal to its predecessor
pub fn is_non_decreasing<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_geq() {
        let arr = [0.0, 10.0, 26.8224, 30.0];
        assert_eq!(first_geq(&arr, 26.8224), Some(2));
        assert_eq!(first_geq(&arr, 31.0), None);
    }

    #[test]
    fn test_ndarrmax() {
        assert_eq!(ndarrmax(&array![1.0, -2.0, 7.5]), 7.5);
        assert!(ndarrmax(&Array1::zeros(0)).is_nan());
    }

    #[test]
    fn test_is_non_decreasing() {
        assert!(is_non_decreasing(&[1, 1, 2]));
        assert!(!is_non_decreasing(&[1.0, 0.5]));
    }
}
