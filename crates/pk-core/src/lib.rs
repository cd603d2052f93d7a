//! pk-core: stable foundation for cylpack.
//!
//! Contains:
//! - circle (circular inclusion: center, radius, overlap queries)
//! - domain (axis-aligned rectangle: containment, boundary penetration)
//! - numeric (Real + float validation helpers + 2-D vector alias)
//! - ids (compact circle identifiers)
//! - error (shared error types)

pub mod circle;
pub mod domain;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use circle::Circle;
pub use domain::Domain;
pub use error::{PkError, PkResult};
pub use ids::*;
pub use numeric::*;
