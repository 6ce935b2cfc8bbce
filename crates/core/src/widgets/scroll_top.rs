use folio_protocol::DomCommand;

/// Floating "back to top" button, shown once the page is scrolled past a
/// threshold.
#[derive(Debug, Clone)]
pub struct ScrollToTop {
    threshold: f64,
    visible: bool,
}

impl ScrollToTop {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Emits only when visibility flips.
    pub fn update(&mut self, scroll_y: f64) -> Option<DomCommand> {
        let visible = scroll_y > self.threshold;
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(DomCommand::SetScrollTopVisible { visible })
    }

    pub fn click(&self) -> DomCommand {
        DomCommand::ScrollTo {
            top: 0.0,
            smooth: true,
        }
    }
}
