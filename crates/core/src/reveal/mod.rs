pub mod animator;
pub mod watcher;

pub use animator::{RegisterOutcome, RevealAnimator, RevealKind, RevealState, parse_width_percent};
pub use watcher::{Crossing, ObserveOptions, SubscriptionId, ViewportWatcher};
