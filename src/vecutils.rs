//! Vector utility functions like min(), max(), mean()
pub fn max(vec: &[f64]) -> Option<f64> {
    vec.iter().cloned().max_by(f64::total_cmp)
}

pub fn min(vec: &[f64]) -> Option<f64> {
    vec.iter().cloned().min_by(f64::total_cmp)
}

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.iter().sum::<f64>() / vec.len() as f64)
}

/// Evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Checks if two arrays or vectors are almost equal.
///
/// Elements in both containers must be in the same order.
pub fn almost_equal(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max() {
        assert_eq!(max(&[1.0, 3.0, 2.0]), Some(3.0));
        assert_eq!(max(&[-5.0, -1.0, -3.0]), Some(-1.0));
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_min() {
        assert_eq!(min(&[1.0, 3.0, 2.0]), Some(1.0));
        assert_eq!(min(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[20.0, 50.0, 50.0]), Some(40.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_linspace() {
        assert!(almost_equal(&linspace(0., 10., 5), &[0., 2.5, 5., 7.5, 10.], 1e-12));
        assert_eq!(linspace(0., 10., 1), vec![0.]);
        assert!(linspace(0., 10., 0).is_empty());
        // Last value is exact
        assert_eq!(*linspace(0., 10., 7).last().unwrap(), 10.);
    }

    #[test]
    fn test_almost_equal_false() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 4.0];
        assert!(!almost_equal(&a, &b, 1e-10));
    }

    #[test]
    fn test_almost_equal_different_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(!almost_equal(&a, &b, 1e-10));
    }
}
