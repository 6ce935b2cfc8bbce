//! Active nav link tracking.
//!
//! The section under the marker line (scroll offset plus the fixed-header
//! look-ahead) owns the highlight. Exactly one link, or none, carries the
//! `active` class at any time.

use folio_protocol::{DomCommand, ElementId, Section};
use log::debug;

use crate::layout::LayoutSource;

/// Look-ahead under the fixed header, in CSS pixels.
pub const HEADER_OFFSET: f64 = 100.0;

/// First section in document order whose extent contains
/// `scroll_y + header_offset`. Both edges are inclusive, so on a shared
/// boundary the earlier section wins.
pub fn compute_active_section(
    scroll_y: f64,
    sections: &[Section],
    header_offset: f64,
) -> Option<&ElementId> {
    let marker = scroll_y + header_offset;
    sections
        .iter()
        .find(|s| marker >= s.top && marker <= s.top + s.height)
        .map(|s| &s.id)
}

#[derive(Debug, Clone, PartialEq)]
struct NavLink {
    target: ElementId,
    active: bool,
}

/// The set of in-page nav links, one entry per target section.
#[derive(Debug, Clone, Default)]
pub struct NavLinks {
    links: Vec<NavLink>,
}

impl NavLinks {
    /// Build from link `href`s. External links and repeated targets are
    /// skipped.
    pub fn from_hrefs<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut links: Vec<NavLink> = Vec::new();
        for href in hrefs {
            let Some(target) = ElementId::from_anchor(href) else {
                continue;
            };
            if links.iter().any(|l| l.target == target) {
                continue;
            }
            links.push(NavLink {
                target,
                active: false,
            });
        }
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Target of the currently highlighted link.
    pub fn active(&self) -> Option<&ElementId> {
        self.links.iter().find(|l| l.active).map(|l| &l.target)
    }

    /// Move the highlight to `target` (or clear it), returning only the
    /// toggles that change something.
    fn highlight(&mut self, target: Option<&ElementId>) -> Vec<DomCommand> {
        let mut commands = Vec::new();
        // Deactivate first so a host applying commands in order never shows
        // two active links.
        for link in &mut self.links {
            if link.active && Some(&link.target) != target {
                link.active = false;
                commands.push(DomCommand::SetLinkActive {
                    section: link.target.clone(),
                    active: false,
                });
            }
        }
        if let Some(link) = self
            .links
            .iter_mut()
            .find(|l| Some(&l.target) == target && !l.active)
        {
            link.active = true;
            commands.push(DomCommand::SetLinkActive {
                section: link.target.clone(),
                active: true,
            });
        }
        commands
    }
}

/// Owner of the nav-link highlight state.
#[derive(Debug, Clone)]
pub struct SectionActivation {
    links: NavLinks,
    header_offset: f64,
}

impl SectionActivation {
    pub fn new(links: NavLinks, header_offset: f64) -> Self {
        Self {
            links,
            header_offset,
        }
    }

    /// Replace the link set, clearing any highlight on links that are gone.
    pub fn set_links(&mut self, links: NavLinks) -> Vec<DomCommand> {
        let previous = self.links.active().cloned();
        self.links = links;
        match previous {
            Some(target) if !self.links.links.iter().any(|l| l.target == target) => {
                vec![DomCommand::SetLinkActive {
                    section: target,
                    active: false,
                }]
            }
            Some(target) => self.links.highlight(Some(&target)),
            None => Vec::new(),
        }
    }

    pub fn links(&self) -> &NavLinks {
        &self.links
    }

    /// Recompute the active section for `scroll_y`.
    ///
    /// Emits nothing when the active section has not changed. When no
    /// section matches, every link is deactivated.
    pub fn update(&mut self, scroll_y: f64, layout: &impl LayoutSource) -> Vec<DomCommand> {
        let active = compute_active_section(scroll_y, layout.sections(), self.header_offset);
        let commands = self.links.highlight(active);
        if !commands.is_empty() {
            debug!(
                "active section at y={scroll_y}: {}",
                active.map_or("none", ElementId::as_str)
            );
        }
        commands
    }
}
