use anyhow::{Context, Result, bail};
use folio_core::layout::validate_layout;
use folio_core::reveal::{RevealKind, parse_width_percent};
use folio_core::timer::Millis;
use folio_core::widgets::ContactFields;
use folio_core::{Page, PageConfig};
use folio_protocol::{DomCommand, PageLayout, Viewport};
use serde::Deserialize;

/// A recorded page session: initial state plus a timeline of host events.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub config: PageConfig,
    #[serde(default)]
    pub typing_shown: bool,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default)]
    pub nav_links: Vec<String>,
    pub layout: PageLayout,
    #[serde(default)]
    pub reveal: Vec<RevealTarget>,
    pub events: Vec<TimedEvent>,
}

fn default_viewport_height() -> f64 {
    800.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealTarget {
    Fade { element: String },
    SkillBar { element: String, width: String },
}

#[derive(Debug, Deserialize)]
pub struct TimedEvent {
    pub at: Millis,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Start { scroll_y: f64 },
    Scroll { scroll_y: f64 },
    Resize {
        scroll_y: f64,
        viewport_height: Option<f64>,
        layout: PageLayout,
    },
    ToggleMenu,
    ClickNavLink { href: String },
    ClickScrollTop,
    SubmitContact { fields: ContactFields },
    MailDelivered { ok: bool },
}

/// One emitted command and the time it was produced.
#[derive(Debug, serde::Serialize)]
pub struct Emitted {
    pub at: Millis,
    pub command: DomCommand,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json).context("parsing scenario")?;
        scenario.config.validate().context("scenario config")?;
        validate_layout(&scenario.layout).context("scenario layout")?;
        if scenario.events.windows(2).any(|w| w[1].at < w[0].at) {
            bail!("scenario events must be in time order");
        }
        Ok(scenario)
    }

    /// Play the timeline, firing timers between events at their own
    /// deadlines, and drain whatever is still pending at the end.
    pub fn run(self) -> Result<Vec<Emitted>> {
        let mut page = Page::new(self.config, self.typing_shown)?;
        page.set_layout(self.layout)?;

        let mut out = Vec::new();
        let mut emit = |at: Millis, commands: Vec<DomCommand>| {
            out.extend(commands.into_iter().map(|command| Emitted { at, command }));
        };

        emit(0, page.set_nav_links(self.nav_links.iter().map(String::as_str)));
        for target in self.reveal {
            let (element, kind) = match target {
                RevealTarget::Fade { element } => (element, RevealKind::Fade),
                RevealTarget::SkillBar { element, width } => {
                    let target_width_percent = parse_width_percent(&width)
                        .with_context(|| format!("skill bar `{element}` width `{width}`"))?;
                    (
                        element,
                        RevealKind::SkillBar {
                            target_width_percent,
                        },
                    )
                }
            };
            let (outcome, commands) = page.register_reveal(element.as_str(), kind);
            log::debug!("register `{element}`: {outcome:?}");
            emit(0, commands);
        }

        let mut viewport_height = self.viewport_height;
        for TimedEvent { at, event } in self.events {
            while let Some(deadline) = page.next_deadline()
                && deadline < at
            {
                emit(deadline, page.advance(deadline));
            }

            let commands = match event {
                Event::Start { scroll_y } => page.start(at, Viewport::new(scroll_y, viewport_height)),
                Event::Scroll { scroll_y } => {
                    page.on_scroll(at, Viewport::new(scroll_y, viewport_height))
                }
                Event::Resize {
                    scroll_y,
                    viewport_height: height,
                    layout,
                } => {
                    viewport_height = height.unwrap_or(viewport_height);
                    page.on_resize(at, Viewport::new(scroll_y, viewport_height), layout)?
                }
                Event::ToggleMenu => page.toggle_menu(),
                Event::ClickNavLink { href } => page.click_nav_link(&href),
                Event::ClickScrollTop => page.click_scroll_top(),
                Event::SubmitContact { fields } => page.submit_contact(at, &fields),
                Event::MailDelivered { ok } => page.mail_delivered(ok),
            };
            emit(at, commands);
        }

        while let Some(deadline) = page.next_deadline() {
            emit(deadline, page.advance(deadline));
        }
        Ok(out)
    }
}
