//! Cell-centered initial lattice.

use crate::error::{LayoutError, LayoutResult};
use pk_core::{Domain, Vec2, vec2};

/// Grid dimensions chosen so that cells are roughly square and `nx·ny >= n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeShape {
    pub nx: usize,
    pub ny: usize,
}

impl LatticeShape {
    pub fn for_count(domain: &Domain, n: usize) -> Self {
        let aspect = domain.width() / domain.height();
        let n = n as f64;
        Self {
            nx: (aspect * n).sqrt().ceil().max(1.0) as usize,
            ny: (n / aspect).sqrt().ceil().max(1.0) as usize,
        }
    }

    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }
}

/// The first `n` cell centers of the lattice, x-major (all `y` for the first
/// column, then the next column).
pub fn lattice_centers(domain: &Domain, n: usize) -> LayoutResult<Vec<Vec2>> {
    if n == 0 {
        return Err(LayoutError::InvalidParam {
            what: "circle count must be positive".to_string(),
        });
    }
    let shape = LatticeShape::for_count(domain, n);
    let lower = domain.lower();
    let dx = domain.width() / shape.nx as f64;
    let dy = domain.height() / shape.ny as f64;

    let centers = (0..shape.nx)
        .flat_map(|i| (0..shape.ny).map(move |j| (i, j)))
        .take(n)
        .map(|(i, j)| {
            vec2(
                lower.x + (i as f64 + 0.5) * dx,
                lower.y + (j as f64 + 0.5) * dy,
            )
        })
        .collect();
    Ok(centers)
}
