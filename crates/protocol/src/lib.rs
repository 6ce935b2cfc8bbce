pub mod commands;
pub mod element_id;
pub mod layout;
pub mod toast;
pub mod types;

pub use commands::DomCommand;
pub use element_id::ElementId;
pub use layout::{PageLayout, Section};
pub use toast::ToastKind;
pub use types::{Bounds, Viewport};
