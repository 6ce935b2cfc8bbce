//! Small page affordances around the scroll pipeline.

pub mod contact;
pub mod menu;
pub mod scroll_top;
pub mod typing;

pub use contact::{ContactError, ContactFields, ContactForm, is_valid_email};
pub use menu::NavMenu;
pub use scroll_top::ScrollToTop;
pub use typing::{TypingEffect, TypingStep};
