//! Initial layout generation: everything that happens before relaxation.
//!
//! 1. lattice: cell-centered grid of `n` centers inside the domain
//! 2. radii: seeded normal sampling of radii
//! 3. fraction: rescale radii to hit a target area fraction

pub mod error;
pub mod fraction;
pub mod lattice;
pub mod radii;

pub use error::{LayoutError, LayoutResult};
pub use fraction::{area_fraction, rescale_to_fraction};
pub use lattice::{LatticeShape, lattice_centers};
pub use radii::{RadiusSampler, resolve_seed};

use pk_core::{Circle, Domain};
use tracing::info;

/// Inputs for [`generate`].
#[derive(Clone, Debug)]
pub struct LayoutParams {
    pub count: usize,
    pub sampler: RadiusSampler,
    /// Target area fraction in (0, 1); `None` keeps the sampled radii.
    pub target_area_fraction: Option<f64>,
}

/// Sample radii, place them on the lattice and rescale.
pub fn generate(domain: &Domain, params: &LayoutParams) -> LayoutResult<Vec<Circle>> {
    let centers = lattice_centers(domain, params.count)?;
    let radii = params.sampler.sample(params.count)?;

    let mut circles = centers
        .into_iter()
        .zip(radii)
        .map(|(c, r)| Circle::new(c, r))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(target) = params.target_area_fraction {
        let ratio = rescale_to_fraction(&mut circles, domain, target)?;
        info!(
            count = circles.len(),
            target,
            ratio,
            "rescaled radii to target area fraction"
        );
    }

    Ok(circles)
}
