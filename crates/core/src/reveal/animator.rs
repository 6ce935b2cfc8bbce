//! Fire-once reveal animations.
//!
//! Every registered element is a one-way latch: `Pending` until its first
//! threshold crossing, `Revealed` forever after. The subscription is
//! released before the reveal command is produced, so no later measurement
//! can replay the animation.

use std::collections::HashMap;

use folio_protocol::{DomCommand, ElementId, Viewport};
use log::{debug, trace};

use super::watcher::{Crossing, ObserveOptions, SubscriptionId, ViewportWatcher};
use crate::config::{FadeConfig, SkillBarConfig};
use crate::layout::LayoutSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealKind {
    /// Slide up and fade in.
    Fade,
    /// Grow a progress bar to its target width.
    SkillBar { target_width_percent: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    /// Already waiting for its crossing; nothing changed.
    AlreadyPending,
    /// Already revealed; the animation is not replayed.
    AlreadyRevealed,
    /// The element is not in the layout; nothing is tracked.
    NotInLayout,
}

/// Parse a `data-width` attribute (`"75%"`, `"75"`) into a percentage
/// clamped to 0..=100.
pub fn parse_width_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = number.parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

#[derive(Debug)]
struct Tracked {
    kind: RevealKind,
    state: RevealState,
    subscription: Option<SubscriptionId>,
}

/// Owns the reveal state of every fade target and skill bar, and the
/// watcher subscriptions feeding it.
#[derive(Debug)]
pub struct RevealAnimator {
    watcher: ViewportWatcher,
    tracked: HashMap<ElementId, Tracked>,
    fade: FadeConfig,
    skill_bar: SkillBarConfig,
}

impl RevealAnimator {
    pub fn new(fade: FadeConfig, skill_bar: SkillBarConfig) -> Self {
        Self {
            watcher: ViewportWatcher::new(),
            tracked: HashMap::new(),
            fade,
            skill_bar,
        }
    }

    /// Start tracking `element`.
    ///
    /// Fade targets get their pending style immediately. Registering an
    /// element a second time never replays its pending style; a pending
    /// element whose subscription was lost while it was out of the layout
    /// is observed again.
    pub fn register(
        &mut self,
        element: ElementId,
        kind: RevealKind,
        layout: &impl LayoutSource,
    ) -> (RegisterOutcome, Vec<DomCommand>) {
        if let Some(existing) = self.tracked.get_mut(&element) {
            let outcome = match existing.state {
                RevealState::Pending => {
                    resubscribe(
                        &mut self.watcher,
                        &element,
                        existing,
                        &self.fade,
                        &self.skill_bar,
                        layout,
                    );
                    RegisterOutcome::AlreadyPending
                }
                RevealState::Revealed => RegisterOutcome::AlreadyRevealed,
            };
            trace!("register `{element}` ignored: {outcome:?}");
            return (outcome, Vec::new());
        }

        let options = observe_options(kind, &self.fade, &self.skill_bar);
        let Some(subscription) = self.watcher.observe(element.clone(), options, layout) else {
            return (RegisterOutcome::NotInLayout, Vec::new());
        };

        let kind = match kind {
            RevealKind::SkillBar {
                target_width_percent,
            } => RevealKind::SkillBar {
                target_width_percent: clamp_percent(target_width_percent),
            },
            fade => fade,
        };

        let mut commands = Vec::new();
        if kind == RevealKind::Fade {
            commands.push(DomCommand::SetPendingStyle {
                element: element.clone(),
                opacity: 0.0,
                translate_y: self.fade.rise,
                animation: format!("{} paused", self.fade.animation),
            });
        }

        self.tracked.insert(
            element,
            Tracked {
                kind,
                state: RevealState::Pending,
                subscription: Some(subscription),
            },
        );
        (RegisterOutcome::Registered, commands)
    }

    /// Measure every pending element against `viewport` and reveal the
    /// ones that crossed their threshold.
    pub fn on_viewport(
        &mut self,
        viewport: &Viewport,
        layout: &impl LayoutSource,
    ) -> Vec<DomCommand> {
        // The watcher drops subscriptions of elements that left the layout;
        // pick them up again once the element is back.
        for (element, tracked) in &mut self.tracked {
            if tracked.state == RevealState::Pending {
                resubscribe(
                    &mut self.watcher,
                    element,
                    tracked,
                    &self.fade,
                    &self.skill_bar,
                    layout,
                );
            }
        }
        let crossings = self.watcher.evaluate(viewport, layout);
        crossings
            .into_iter()
            .filter_map(|c| self.handle_crossing(&c))
            .collect()
    }

    /// Apply one crossing notification. Crossings for unknown elements or
    /// elements already revealed produce nothing.
    pub fn handle_crossing(&mut self, crossing: &Crossing) -> Option<DomCommand> {
        let tracked = self.tracked.get_mut(&crossing.element)?;
        if tracked.state == RevealState::Revealed {
            trace!("crossing for revealed `{}` ignored", crossing.element);
            return None;
        }

        // Release before emitting: nothing may reach this element again.
        if let Some(subscription) = tracked.subscription.take() {
            self.watcher.unobserve(subscription);
        }
        tracked.state = RevealState::Revealed;
        debug!("revealed `{}`", crossing.element);

        let element = crossing.element.clone();
        Some(match tracked.kind {
            RevealKind::Fade => DomCommand::PlayReveal {
                element,
                class: self.fade.revealed_class.clone(),
            },
            RevealKind::SkillBar {
                target_width_percent,
            } => DomCommand::SetProgressWidth {
                element,
                percent: target_width_percent,
            },
        })
    }

    pub fn state(&self, element: &str) -> Option<RevealState> {
        self.tracked.get(element).map(|t| t.state)
    }

    /// Elements still waiting for their crossing.
    pub fn pending_count(&self) -> usize {
        self.tracked
            .values()
            .filter(|t| t.state == RevealState::Pending)
            .count()
    }

    /// Live watcher subscriptions (one per pending element still in the
    /// layout).
    pub fn subscription_count(&self) -> usize {
        self.watcher.len()
    }
}

fn observe_options(kind: RevealKind, fade: &FadeConfig, skill_bar: &SkillBarConfig) -> ObserveOptions {
    match kind {
        RevealKind::Fade => ObserveOptions::new(fade.threshold, fade.bottom_margin),
        RevealKind::SkillBar { .. } => ObserveOptions::new(skill_bar.threshold, 0.0),
    }
}

/// Make sure a pending element has a live subscription if it is in the
/// layout. A dead id is cleared even when the element is still missing.
fn resubscribe(
    watcher: &mut ViewportWatcher,
    element: &ElementId,
    tracked: &mut Tracked,
    fade: &FadeConfig,
    skill_bar: &SkillBarConfig,
    layout: &impl LayoutSource,
) {
    if tracked.subscription.is_some_and(|id| watcher.is_observing(id)) {
        return;
    }
    let options = observe_options(tracked.kind, fade, skill_bar);
    tracked.subscription = watcher.observe(element.clone(), options, layout);
    if tracked.subscription.is_some() {
        debug!("`{element}` is back in the layout; observing again");
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::{Bounds, PageLayout};

    fn animator() -> RevealAnimator {
        RevealAnimator::new(FadeConfig::default(), SkillBarConfig::default())
    }

    fn layout() -> PageLayout {
        PageLayout::new()
            .with_element("about-content", Bounds::new(900.0, 400.0))
            .with_element("skill-rust", Bounds::new(1_500.0, 10.0))
    }

    fn vp(scroll_y: f64) -> Viewport {
        Viewport::new(scroll_y, 800.0)
    }

    #[test]
    fn fade_registers_with_pending_style() {
        let layout = layout();
        let mut a = animator();
        let (outcome, cmds) = a.register("about-content".into(), RevealKind::Fade, &layout);
        assert_eq!(outcome, RegisterOutcome::Registered);
        assert_eq!(
            cmds,
            vec![DomCommand::SetPendingStyle {
                element: "about-content".into(),
                opacity: 0.0,
                translate_y: 30.0,
                animation: "fadeInUp 0.8s ease forwards paused".into(),
            }]
        );
        assert_eq!(a.state("about-content"), Some(RevealState::Pending));
    }

    #[test]
    fn fade_plays_once() {
        let layout = layout();
        let mut a = animator();
        a.register("about-content".into(), RevealKind::Fade, &layout);

        assert!(a.on_viewport(&vp(0.0), &layout).is_empty());
        let cmds = a.on_viewport(&vp(400.0), &layout);
        assert_eq!(
            cmds,
            vec![DomCommand::PlayReveal {
                element: "about-content".into(),
                class: "animate-fadeInUp".into(),
            }]
        );
        assert_eq!(a.state("about-content"), Some(RevealState::Revealed));
        assert_eq!(a.subscription_count(), 0);

        // Leave and come back: still nothing.
        assert!(a.on_viewport(&vp(0.0), &layout).is_empty());
        assert!(a.on_viewport(&vp(400.0), &layout).is_empty());
    }

    #[test]
    fn skill_bar_sets_width_exactly_once() {
        let layout = layout();
        let mut a = animator();
        let (outcome, cmds) = a.register(
            "skill-rust".into(),
            RevealKind::SkillBar {
                target_width_percent: 75.0,
            },
            &layout,
        );
        assert_eq!(outcome, RegisterOutcome::Registered);
        assert!(cmds.is_empty());

        let cmds = a.on_viewport(&vp(1_000.0), &layout);
        assert_eq!(
            cmds,
            vec![DomCommand::SetProgressWidth {
                element: "skill-rust".into(),
                percent: 75.0,
            }]
        );

        // A stale crossing delivered directly changes nothing.
        let stale = Crossing {
            subscription: SubscriptionId(0),
            element: "skill-rust".into(),
        };
        assert_eq!(a.handle_crossing(&stale), None);
        assert_eq!(a.handle_crossing(&stale), None);
    }

    #[test]
    fn reregistering_revealed_element_is_a_noop() {
        let layout = layout();
        let mut a = animator();
        a.register("about-content".into(), RevealKind::Fade, &layout);
        a.on_viewport(&vp(400.0), &layout);

        let (outcome, cmds) = a.register("about-content".into(), RevealKind::Fade, &layout);
        assert_eq!(outcome, RegisterOutcome::AlreadyRevealed);
        assert!(cmds.is_empty());
        assert!(a.on_viewport(&vp(400.0), &layout).is_empty());
        assert_eq!(a.subscription_count(), 0);
    }

    #[test]
    fn reregistering_pending_element_keeps_one_subscription() {
        let layout = layout();
        let mut a = animator();
        a.register("about-content".into(), RevealKind::Fade, &layout);
        let (outcome, cmds) = a.register("about-content".into(), RevealKind::Fade, &layout);
        assert_eq!(outcome, RegisterOutcome::AlreadyPending);
        assert!(cmds.is_empty());
        assert_eq!(a.subscription_count(), 1);
        assert_eq!(a.on_viewport(&vp(400.0), &layout).len(), 1);
    }

    #[test]
    fn pending_fade_survives_leaving_the_layout() {
        let full = layout();
        let without = PageLayout::new().with_element("skill-rust", Bounds::new(1_500.0, 10.0));
        let mut a = animator();
        a.register("about-content".into(), RevealKind::Fade, &full);

        assert!(a.on_viewport(&vp(0.0), &without).is_empty());
        assert_eq!(a.subscription_count(), 0);
        assert_eq!(a.state("about-content"), Some(RevealState::Pending));

        let (outcome, cmds) = a.register("about-content".into(), RevealKind::Fade, &full);
        assert_eq!(outcome, RegisterOutcome::AlreadyPending);
        assert!(cmds.is_empty());
        assert_eq!(a.subscription_count(), 1);

        assert_eq!(
            a.on_viewport(&vp(400.0), &full),
            vec![DomCommand::PlayReveal {
                element: "about-content".into(),
                class: "animate-fadeInUp".into(),
            }]
        );
        assert_eq!(a.subscription_count(), 0);
    }

    #[test]
    fn restored_element_is_observed_without_reregistering() {
        let full = layout();
        let mut a = animator();
        a.register(
            "skill-rust".into(),
            RevealKind::SkillBar {
                target_width_percent: 60.0,
            },
            &full,
        );
        assert!(a.on_viewport(&vp(0.0), &PageLayout::new()).is_empty());
        assert_eq!(a.subscription_count(), 0);

        let cmds = a.on_viewport(&vp(1_000.0), &full);
        assert_eq!(
            cmds,
            vec![DomCommand::SetProgressWidth {
                element: "skill-rust".into(),
                percent: 60.0,
            }]
        );
    }

    #[test]
    fn missing_element_is_not_tracked() {
        let layout = layout();
        let mut a = animator();
        let (outcome, cmds) = a.register("ghost".into(), RevealKind::Fade, &layout);
        assert_eq!(outcome, RegisterOutcome::NotInLayout);
        assert!(cmds.is_empty());
        assert_eq!(a.state("ghost"), None);
    }

    #[test]
    fn skill_width_is_clamped() {
        let layout = layout();
        let mut a = animator();
        a.register(
            "skill-rust".into(),
            RevealKind::SkillBar {
                target_width_percent: 140.0,
            },
            &layout,
        );
        let cmds = a.on_viewport(&vp(1_000.0), &layout);
        assert!(matches!(
            cmds.as_slice(),
            [DomCommand::SetProgressWidth { percent, .. }] if *percent == 100.0
        ));
    }

    #[test]
    fn parses_data_width() {
        assert_eq!(parse_width_percent("75%"), Some(75.0));
        assert_eq!(parse_width_percent(" 90 % "), Some(90.0));
        assert_eq!(parse_width_percent("60"), Some(60.0));
        assert_eq!(parse_width_percent("250%"), Some(100.0));
        assert_eq!(parse_width_percent("wide"), None);
        assert_eq!(parse_width_percent("NaN%"), None);
    }
}
