use folio_protocol::DomCommand;

/// Mobile nav menu (hamburger toggle).
#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> DomCommand {
        self.open = !self.open;
        DomCommand::SetMenuOpen { open: self.open }
    }

    /// Close after a link is followed. No-op when already closed.
    pub fn close(&mut self) -> Option<DomCommand> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(DomCommand::SetMenuOpen { open: false })
    }
}
