//! Threshold-crossing observation over element geometry.
//!
//! Mirrors what an `IntersectionObserver` reports, but measured from an
//! explicit [`Viewport`] and layout snapshot so it runs without a browser.

use std::collections::BTreeMap;

use folio_protocol::{ElementId, Viewport};
use log::{debug, trace};

use crate::layout::LayoutSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction (0..=1) that counts as "in view".
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport before measuring.
    pub bottom_margin: f64,
}

impl ObserveOptions {
    pub fn new(threshold: f64, bottom_margin: f64) -> Self {
        Self {
            threshold,
            bottom_margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// An element became visible enough to pass its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub subscription: SubscriptionId,
    pub element: ElementId,
}

#[derive(Debug)]
struct Subscription {
    element: ElementId,
    options: ObserveOptions,
    /// `None` until the first measurement, which counts as entering from
    /// fully hidden.
    last_fraction: Option<f64>,
}

impl Subscription {
    fn entered(&self, fraction: f64) -> bool {
        let was_below = self
            .last_fraction
            .is_none_or(|last| last < self.options.threshold);
        was_below && fraction > 0.0 && fraction >= self.options.threshold
    }
}

#[derive(Debug, Default)]
pub struct ViewportWatcher {
    // Ordered by id so crossings come out in observation order.
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl ViewportWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `element`. Returns `None` (and watches nothing) when
    /// the element is not in the layout.
    pub fn observe(
        &mut self,
        element: ElementId,
        options: ObserveOptions,
        layout: &impl LayoutSource,
    ) -> Option<SubscriptionId> {
        if layout.bounds(&element).is_none() {
            debug!("observe `{element}` skipped: not in layout");
            return None;
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        trace!("observe `{element}` as {id:?} at {}", options.threshold);
        self.subscriptions.insert(
            id,
            Subscription {
                element,
                options,
                last_fraction: None,
            },
        );
        Some(id)
    }

    /// Stop watching. Returns `false` for unknown or already released ids.
    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    pub fn is_observing(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Measure every subscription against `viewport` and report the ones
    /// that entered past their threshold since the last measurement.
    ///
    /// Subscriptions whose element has left the layout are dropped without
    /// a notification.
    pub fn evaluate(&mut self, viewport: &Viewport, layout: &impl LayoutSource) -> Vec<Crossing> {
        let mut crossings = Vec::new();
        self.subscriptions.retain(|&id, sub| {
            let Some(bounds) = layout.bounds(&sub.element) else {
                debug!("`{}` left the layout; dropping {id:?}", sub.element);
                return false;
            };
            let fraction = viewport.visible_fraction(&bounds, sub.options.bottom_margin);
            if sub.entered(fraction) {
                crossings.push(Crossing {
                    subscription: id,
                    element: sub.element.clone(),
                });
            }
            sub.last_fraction = Some(fraction);
            true
        });
        crossings
    }
}
