//! `cylinders.info` geometry emission.
//!
//! One block per circle whose center lies strictly inside the domain:
//!
//! ```text
//! Cylinder3
//! {
//!   geometry
//!   {
//!     center (0.75,0.5)
//!     radius 0.1
//!   }
//! }
//!
//! ```
//!
//! Block names keep the circle's original index, so skipped circles leave
//! gaps in the numbering.

use crate::ResultsResult;
use pk_core::{Circle, CircleId, Domain, Vec2};
use std::io::Write;
use std::path::Path;
use tracing::warn;

#[derive(Clone, Debug, PartialEq)]
pub struct EmitOptions {
    /// Added to every written center.
    pub offset: Vec2,
    pub name_prefix: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            name_prefix: "Cylinder".to_string(),
        }
    }
}

/// Which circles made it into the geometry file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub written: Vec<CircleId>,
    pub skipped: Vec<CircleId>,
}

impl EmitReport {
    pub fn all_written(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub fn write_cylinder_info<W: Write>(
    mut out: W,
    circles: &[Circle],
    domain: &Domain,
    options: &EmitOptions,
) -> ResultsResult<EmitReport> {
    let mut report = EmitReport::default();

    for (i, circle) in circles.iter().enumerate() {
        let id = CircleId::from_index(i);
        if !domain.contains(circle.center) {
            warn!(
                circle = i,
                x = circle.center.x,
                y = circle.center.y,
                "circle center outside domain, not writing"
            );
            report.skipped.push(id);
            continue;
        }

        let c = circle.center + options.offset;
        write!(
            out,
            "{prefix}{i}\n{{\n  geometry\n  {{\n    center ({x},{y})\n    radius {r}\n  }}\n}}\n\n",
            prefix = options.name_prefix,
            x = c.x,
            y = c.y,
            r = circle.radius(),
        )?;
        report.written.push(id);
    }

    out.flush()?;
    Ok(report)
}

/// Render into a string instead of a writer.
pub fn render_cylinder_info(
    circles: &[Circle],
    domain: &Domain,
    options: &EmitOptions,
) -> ResultsResult<(String, EmitReport)> {
    let mut buf = Vec::new();
    let report = write_cylinder_info(&mut buf, circles, domain, options)?;
    Ok((String::from_utf8_lossy(&buf).into_owned(), report))
}

pub fn save_cylinder_info(
    path: &Path,
    circles: &[Circle],
    domain: &Domain,
    options: &EmitOptions,
) -> ResultsResult<EmitReport> {
    let file = std::fs::File::create(path)?;
    write_cylinder_info(std::io::BufWriter::new(file), circles, domain, options)
}
