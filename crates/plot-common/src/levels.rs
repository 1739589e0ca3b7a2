//! Level sequences and barb increments.

use serde::{Deserialize, Serialize};

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Values from `start` up to (not including) `stop` in steps of `step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || (stop - start) / step <= 0.0 {
        return vec![];
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Wind speeds represented by each barb element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarbIncrements {
    pub half: f32,
    pub full: f32,
    pub flag: f32,
}

impl Default for BarbIncrements {
    fn default() -> Self {
        Self {
            half: 5.0,
            full: 10.0,
            flag: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_pressure_levels() {
        let levels = linspace(70.0, 100.0, 150);
        assert_eq!(levels.len(), 150);
        assert_eq!(levels[0], 70.0);
        assert_eq!(levels[149], 100.0);
        assert!((levels[1] - levels[0] - 30.0 / 149.0).abs() < 1e-9);
    }

    #[test]
    fn test_linspace_edge_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn test_arange_ticks() {
        let ticks = arange(70.0, 102.0, 2.0);
        assert_eq!(ticks.len(), 16);
        assert_eq!(ticks[0], 70.0);
        assert_eq!(*ticks.last().unwrap(), 100.0);
    }

    #[test]
    fn test_arange_empty() {
        assert!(arange(5.0, 0.0, 1.0).is_empty());
        assert!(arange(0.0, 5.0, 0.0).is_empty());
    }
}
