//! The page orchestrator.
//!
//! Owns one instance of every behavior and routes host events to them:
//!
//! - scroll / resize → scroll-to-top button, reveal animator (directly) and
//!   section activation (through the throttle)
//! - timer deadlines → throttle deliveries and typing steps
//! - clicks and form submits → menu, scroll-to-top, contact form
//!
//! Every entry point first runs the timers that fell due before `now`, so
//! a host that calls [`Page::advance`] late still sees events in order.

use folio_protocol::{DomCommand, ElementId, PageLayout, Viewport};
use log::{debug, trace};

use crate::config::{ConfigError, PageConfig};
use crate::layout::{LayoutError, LayoutSource, validate_layout};
use crate::reveal::{RegisterOutcome, RevealAnimator, RevealKind};
use crate::scroll::{NavLinks, SectionActivation, ThrottleId, ThrottleRegistry};
use crate::timer::{Millis, TimerQueue};
use crate::widgets::{ContactFields, ContactForm, NavMenu, ScrollToTop, TypingEffect, TypingStep};

/// Identity of a throttled scroll handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollHandler {
    ActiveSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTask {
    Throttle(ThrottleId),
    Typing(TypingStep),
}

#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    layout: PageLayout,
    viewport: Viewport,
    now: Millis,
    started: bool,
    timers: TimerQueue<TimerTask>,
    throttles: ThrottleRegistry<ScrollHandler, Viewport>,
    active_section: ThrottleId,
    activation: SectionActivation,
    reveal: RevealAnimator,
    scroll_top: ScrollToTop,
    menu: NavMenu,
    typing: TypingEffect,
    contact: ContactForm,
}

impl Page {
    /// Build a page. `typing_shown` is the session flag recorded by an
    /// earlier visit in the same browser session.
    pub fn new(config: PageConfig, typing_shown: bool) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut throttles = ThrottleRegistry::new();
        let active_section = throttles.wrap(ScrollHandler::ActiveSection, config.scroll_throttle_ms);

        Ok(Self {
            layout: PageLayout::new(),
            viewport: Viewport::new(0.0, 0.0),
            now: 0,
            started: false,
            timers: TimerQueue::new(),
            throttles,
            active_section,
            activation: SectionActivation::new(NavLinks::default(), config.header_offset),
            reveal: RevealAnimator::new(config.fade.clone(), config.skill_bar.clone()),
            scroll_top: ScrollToTop::new(config.scroll_top_threshold),
            menu: NavMenu::new(),
            typing: TypingEffect::new(config.typing.clone(), typing_shown),
            contact: ContactForm::new(config.contact.clone()),
            config,
        })
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn activation(&self) -> &SectionActivation {
        &self.activation
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    pub fn menu(&self) -> &NavMenu {
        &self.menu
    }

    pub fn scroll_top(&self) -> &ScrollToTop {
        &self.scroll_top
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    /// Wrap a scroll handler in the page's throttle. Wrapping a handler
    /// that is already wrapped returns the existing throttle.
    pub fn wrap_scroll_handler(&mut self, handler: ScrollHandler) -> ThrottleId {
        self.throttles.wrap(handler, self.config.scroll_throttle_ms)
    }

    /// Install the nav links (their `href`s).
    pub fn set_nav_links<'a>(&mut self, hrefs: impl IntoIterator<Item = &'a str>) -> Vec<DomCommand> {
        self.activation.set_links(NavLinks::from_hrefs(hrefs))
    }

    /// Replace the geometry snapshot without treating it as an event.
    pub fn set_layout(&mut self, layout: PageLayout) -> Result<(), LayoutError> {
        validate_layout(&layout)?;
        self.layout = layout;
        Ok(())
    }

    /// Track a reveal target. Once the page has started, an element that
    /// is already in view is revealed in the same call.
    pub fn register_reveal(
        &mut self,
        element: impl Into<ElementId>,
        kind: RevealKind,
    ) -> (RegisterOutcome, Vec<DomCommand>) {
        let (outcome, mut commands) = self.reveal.register(element.into(), kind, &self.layout);
        if self.started && outcome == RegisterOutcome::Registered {
            commands.extend(self.reveal.on_viewport(&self.viewport, &self.layout));
        }
        (outcome, commands)
    }

    /// First paint: measure everything once and start the typing effect.
    /// Later calls only advance timers.
    pub fn start(&mut self, now: Millis, viewport: Viewport) -> Vec<DomCommand> {
        let mut commands = self.advance(now);
        if self.started {
            return commands;
        }
        self.started = true;
        self.viewport = viewport;
        debug!("page started at {now} (scroll_y {})", viewport.scroll_y);

        let (typing, steps) = self.typing.start(self.now);
        commands.extend(typing);
        for (at, step) in steps {
            self.timers.schedule(at, TimerTask::Typing(step));
        }

        commands.extend(self.scroll_top.update(viewport.scroll_y));
        commands.extend(self.activation.update(viewport.scroll_y, &self.layout));
        commands.extend(self.reveal.on_viewport(&viewport, &self.layout));
        commands
    }

    pub fn on_scroll(&mut self, now: Millis, viewport: Viewport) -> Vec<DomCommand> {
        let mut commands = self.advance(now);
        self.viewport = viewport;
        trace!("scroll to {} at {}", viewport.scroll_y, self.now);

        commands.extend(self.scroll_top.update(viewport.scroll_y));
        commands.extend(self.reveal.on_viewport(&viewport, &self.layout));
        if let Some(at) = self.throttles.call(self.active_section, self.now, viewport) {
            self.timers.schedule(at, TimerTask::Throttle(self.active_section));
        }
        commands
    }

    /// A resize brings fresh geometry and then behaves like a scroll.
    pub fn on_resize(
        &mut self,
        now: Millis,
        viewport: Viewport,
        layout: PageLayout,
    ) -> Result<Vec<DomCommand>, LayoutError> {
        self.set_layout(layout)?;
        Ok(self.on_scroll(now, viewport))
    }

    /// Run every timer due at or before `now`.
    pub fn advance(&mut self, now: Millis) -> Vec<DomCommand> {
        self.now = self.now.max(now);
        let mut commands = Vec::new();
        while let Some((at, task)) = self.timers.pop_due(self.now) {
            match task {
                TimerTask::Throttle(id) => {
                    if let Some(viewport) = self.throttles.flush(id, self.now) {
                        commands.extend(self.activation.update(viewport.scroll_y, &self.layout));
                    }
                }
                TimerTask::Typing(step) => {
                    let (command, next) = self.typing.step(at, step);
                    commands.extend(command);
                    if let Some((next_at, next_step)) = next {
                        self.timers.schedule(next_at, TimerTask::Typing(next_step));
                    }
                }
            }
        }
        commands
    }

    /// When the host should next call [`Page::advance`].
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn toggle_menu(&mut self) -> Vec<DomCommand> {
        vec![self.menu.toggle()]
    }

    /// A `#anchor` link was followed: close the mobile menu and glide to
    /// the top of the target. Unknown targets and external links only
    /// close the menu.
    pub fn click_nav_link(&mut self, href: &str) -> Vec<DomCommand> {
        let mut commands: Vec<DomCommand> = self.menu.close().into_iter().collect();
        let target = ElementId::from_anchor(href).and_then(|id| self.layout.bounds(&id));
        match target {
            Some(bounds) => commands.push(DomCommand::ScrollTo {
                top: bounds.top,
                smooth: true,
            }),
            None => debug!("nav link `{href}` has no target in the layout"),
        }
        commands
    }

    pub fn click_scroll_top(&mut self) -> Vec<DomCommand> {
        vec![self.scroll_top.click()]
    }

    pub fn submit_contact(&mut self, now: Millis, fields: &ContactFields) -> Vec<DomCommand> {
        let mut commands = self.advance(now);
        commands.extend(self.contact.submit(fields));
        commands
    }

    pub fn mail_delivered(&mut self, ok: bool) -> Vec<DomCommand> {
        self.contact.delivered(ok)
    }
}
