use std::collections::HashSet;

use folio_protocol::{Bounds, PageLayout, Section};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),
    #[error("`{id}` has invalid geometry (top {top}, height {height})")]
    InvalidGeometry { id: String, top: f64, height: f64 },
}

/// Read-only view of page geometry.
///
/// The page holds one [`PageLayout`] snapshot, but the watcher and section
/// activation only need these two lookups, which keeps them testable
/// against ad-hoc fixtures.
pub trait LayoutSource {
    /// Sections in document order.
    fn sections(&self) -> &[Section];

    /// Geometry of a tracked element, or `None` once it has left the DOM.
    fn bounds(&self, id: &str) -> Option<Bounds>;
}

impl LayoutSource for PageLayout {
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn bounds(&self, id: &str) -> Option<Bounds> {
        self.bounds_of(id)
    }
}

/// Parse a layout snapshot sent by the host and check it is usable.
pub fn parse_layout(json: &str) -> Result<PageLayout, LayoutError> {
    let layout: PageLayout = serde_json::from_str(json)?;
    validate_layout(&layout)?;
    Ok(layout)
}

/// Section ids must be unique and every extent finite with a non-negative
/// height.
pub fn validate_layout(layout: &PageLayout) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(layout.sections.len());
    for section in &layout.sections {
        if !seen.insert(section.id.as_str()) {
            return Err(LayoutError::DuplicateSection(section.id.to_string()));
        }
        check_geometry(&section.id, section.top, section.height)?;
    }
    for (id, bounds) in &layout.elements {
        check_geometry(id, bounds.top, bounds.height)?;
    }
    Ok(())
}

fn check_geometry(id: &str, top: f64, height: f64) -> Result<(), LayoutError> {
    if top.is_finite() && height.is_finite() && height >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidGeometry {
            id: id.to_string(),
            top,
            height,
        })
    }
}
