//! Radius sampling.

use crate::error::{LayoutError, LayoutResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Draws radii from `N(mean, std_dev)`, redrawing non-positive samples.
#[derive(Clone, Debug, PartialEq)]
pub struct RadiusSampler {
    pub mean: f64,
    pub std_dev: f64,
    /// Fixed seed for reproducible layouts; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl RadiusSampler {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sample(&self, n: usize) -> LayoutResult<Vec<f64>> {
        if !(self.mean.is_finite() && self.mean > 0.0) {
            return Err(LayoutError::InvalidParam {
                what: format!("radius mean must be positive, got {}", self.mean),
            });
        }
        let normal = Normal::new(self.mean, self.std_dev).map_err(|e| LayoutError::InvalidParam {
            what: format!("radius std_dev {}: {e}", self.std_dev),
        })?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // mean > 0 keeps the acceptance probability above one half.
        let radii = (0..n)
            .map(|_| loop {
                let r = normal.sample(&mut rng);
                if r > 0.0 {
                    break r;
                }
            })
            .collect();
        Ok(radii)
    }
}

/// Fixed seed, or a fresh one from the thread RNG.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_seed_keeps_a_fixed_one() {
        assert_eq!(resolve_seed(Some(7)), 7);
        // Two fresh draws colliding is a 1 in 2^64 event.
        assert_ne!(resolve_seed(None), resolve_seed(None));
    }

    #[test]
    fn same_seed_same_radii() {
        let s = RadiusSampler::new(0.1, 0.02).with_seed(42);
        assert_eq!(s.sample(20).unwrap(), s.sample(20).unwrap());
    }

    #[test]
    fn different_seed_different_radii() {
        let a = RadiusSampler::new(0.1, 0.02).with_seed(1).sample(20).unwrap();
        let b = RadiusSampler::new(0.1, 0.02).with_seed(2).sample(20).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_spread_gives_constant_radii() {
        let radii = RadiusSampler::new(0.25, 0.0).with_seed(3).sample(5).unwrap();
        assert!(radii.iter().all(|&r| r == 0.25));
    }

    #[test]
    fn wide_spread_stays_positive() {
        let radii = RadiusSampler::new(0.01, 1.0).with_seed(5).sample(500).unwrap();
        assert_eq!(radii.len(), 500);
        assert!(radii.iter().all(|&r| r > 0.0));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(RadiusSampler::new(0.0, 0.1).sample(3).is_err());
        assert!(RadiusSampler::new(0.1, -0.1).sample(3).is_err());
        assert!(RadiusSampler::new(f64::NAN, 0.1).sample(3).is_err());
    }

    #[test]
    fn sample_mean_is_close() {
        let radii = RadiusSampler::new(0.1, 0.02).with_seed(11).sample(4000).unwrap();
        let mean = radii.iter().sum::<f64>() / radii.len() as f64;
        assert!((mean - 0.1).abs() < 0.002);
    }
}
