use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element_id::ElementId;
use crate::types::Bounds;

/// A top-level `<section>` that a nav link can point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: ElementId,
    /// `offsetTop`.
    pub top: f64,
    /// `clientHeight`.
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<ElementId>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.top, self.height)
    }
}

/// Geometry snapshot of the page, taken by the host after load and after
/// every resize.
///
/// `sections` is in document order; that order breaks ties when section
/// boundaries overlap. `elements` holds every other node the core tracks
/// (reveal targets, skill bars).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub elements: HashMap<ElementId, Bounds>,
}

impl PageLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_element(mut self, id: impl Into<ElementId>, bounds: Bounds) -> Self {
        self.elements.insert(id.into(), bounds);
        self
    }

    /// Geometry of a tracked element, falling back to sections so that a
    /// whole section can be a reveal target.
    pub fn bounds_of(&self, id: &str) -> Option<Bounds> {
        self.elements.get(id).copied().or_else(|| {
            self.sections
                .iter()
                .find(|s| s.id == id)
                .map(Section::bounds)
        })
    }
}
