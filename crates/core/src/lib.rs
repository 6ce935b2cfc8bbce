//! Behavior core for a static portfolio page.
//!
//! Everything here is a function of explicit inputs (layout, viewport,
//! timestamps) plus state the component owns. Outputs are
//! [`DomCommand`](folio_protocol::DomCommand) lists that a host applies.
//!
//! ```text
//!   scroll/resize ─▶ ScrollThrottle ─▶ SectionActivation ─▶ SetLinkActive
//!   layout+scroll ─▶ ViewportWatcher ─▶ RevealAnimator  ─▶ PlayReveal / SetProgressWidth
//! ```

pub mod config;
pub mod layout;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod timer;
pub mod widgets;

pub use config::{ConfigError, PageConfig};
pub use layout::{LayoutError, LayoutSource};
pub use page::Page;
