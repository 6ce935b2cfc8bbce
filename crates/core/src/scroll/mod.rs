pub mod activation;
pub mod throttle;

pub use activation::{HEADER_OFFSET, NavLinks, SectionActivation, compute_active_section};
pub use throttle::{Throttle, ThrottleId, ThrottleRegistry};
