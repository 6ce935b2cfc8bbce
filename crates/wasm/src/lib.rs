//! Browser bridge.
//!
//! Pages live in a handle table; every export takes the handle returned by
//! [`create_page`] and answers with the resulting DOM commands serialized
//! as a JSON array, for the page script to apply in order.

mod logging;

use std::sync::Mutex;

use folio_core::layout::{LayoutError, parse_layout};
use folio_core::reveal::{RegisterOutcome, RevealKind, parse_width_percent};
use folio_core::timer::Millis;
use folio_core::widgets::ContactFields;
use folio_core::{ConfigError, Page, PageConfig};
use folio_protocol::{DomCommand, Viewport};
use thiserror::Error;
use wasm_bindgen::prelude::*;

static PAGES: Mutex<Vec<Page>> = Mutex::new(Vec::new());

#[derive(Debug, Error)]
enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("invalid JSON argument: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid page handle {0}")]
    UnknownPage(usize),
    #[error("invalid skill width `{0}`")]
    SkillWidth(String),
    #[error("unknown log level `{0}`")]
    LogLevel(String),
    #[error("page table poisoned by an earlier panic")]
    Poisoned,
}

fn to_millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

fn with_page<R>(
    handle: usize,
    f: impl FnOnce(&mut Page) -> Result<R, BridgeError>,
) -> Result<R, BridgeError> {
    let mut pages = PAGES.lock().map_err(|_| BridgeError::Poisoned)?;
    let page = pages
        .get_mut(handle)
        .ok_or(BridgeError::UnknownPage(handle))?;
    f(page)
}

fn commands_json(commands: &[DomCommand]) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(commands)?)
}

fn page_commands(
    handle: usize,
    f: impl FnOnce(&mut Page) -> Result<Vec<DomCommand>, BridgeError>,
) -> Result<String, BridgeError> {
    let commands = with_page(handle, f)?;
    commands_json(&commands)
}

fn create(config_json: &str, typing_shown: bool) -> Result<usize, BridgeError> {
    let config = if config_json.trim().is_empty() {
        PageConfig::default()
    } else {
        PageConfig::from_json(config_json)?
    };
    let page = Page::new(config, typing_shown)?;
    let mut pages = PAGES.lock().map_err(|_| BridgeError::Poisoned)?;
    pages.push(page);
    Ok(pages.len() - 1)
}

fn register(handle: usize, element: &str, kind: RevealKind) -> Result<String, BridgeError> {
    page_commands(handle, |page| {
        let (outcome, commands) = page.register_reveal(element, kind);
        if outcome != RegisterOutcome::Registered {
            log::debug!("register `{element}`: {outcome:?}");
        }
        Ok(commands)
    })
}

/// Route `log` output to the console at `level` and install the panic hook.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsError> {
    let filter =
        logging::parse_level(level).ok_or_else(|| BridgeError::LogLevel(level.to_string()))?;
    logging::install(filter);
    Ok(())
}

/// Create a page from a JSON config (`""` or `"{}"` for the defaults).
/// `typing_shown` is the session-storage flag. Returns a handle.
#[wasm_bindgen]
pub fn create_page(config_json: &str, typing_shown: bool) -> Result<usize, JsError> {
    Ok(create(config_json, typing_shown)?)
}

/// Install nav links from a JSON array of `href`s.
#[wasm_bindgen]
pub fn set_nav_links(handle: usize, hrefs_json: &str) -> Result<String, JsError> {
    let hrefs: Vec<String> = serde_json::from_str(hrefs_json).map_err(BridgeError::from)?;
    Ok(page_commands(handle, |page| {
        Ok(page.set_nav_links(hrefs.iter().map(String::as_str)))
    })?)
}

/// Replace the geometry snapshot.
#[wasm_bindgen]
pub fn set_layout(handle: usize, layout_json: &str) -> Result<(), JsError> {
    let layout = parse_layout(layout_json).map_err(BridgeError::from)?;
    Ok(with_page(handle, |page| Ok(page.set_layout(layout)?))?)
}

#[wasm_bindgen]
pub fn register_fade(handle: usize, element: &str) -> Result<String, JsError> {
    Ok(register(handle, element, RevealKind::Fade)?)
}

/// Register a skill bar; `data_width` is its `data-width` attribute.
#[wasm_bindgen]
pub fn register_skill_bar(handle: usize, element: &str, data_width: &str) -> Result<String, JsError> {
    let target_width_percent = parse_width_percent(data_width)
        .ok_or_else(|| BridgeError::SkillWidth(data_width.to_string()))?;
    Ok(register(
        handle,
        element,
        RevealKind::SkillBar {
            target_width_percent,
        },
    )?)
}

#[wasm_bindgen]
pub fn start_page(handle: usize, now: f64, scroll_y: f64, viewport_height: f64) -> Result<String, JsError> {
    let viewport = Viewport::new(scroll_y, viewport_height);
    Ok(page_commands(handle, |page| {
        Ok(page.start(to_millis(now), viewport))
    })?)
}

#[wasm_bindgen]
pub fn on_scroll(handle: usize, now: f64, scroll_y: f64, viewport_height: f64) -> Result<String, JsError> {
    let viewport = Viewport::new(scroll_y, viewport_height);
    Ok(page_commands(handle, |page| {
        Ok(page.on_scroll(to_millis(now), viewport))
    })?)
}

#[wasm_bindgen]
pub fn on_resize(
    handle: usize,
    now: f64,
    scroll_y: f64,
    viewport_height: f64,
    layout_json: &str,
) -> Result<String, JsError> {
    let layout = parse_layout(layout_json).map_err(BridgeError::from)?;
    let viewport = Viewport::new(scroll_y, viewport_height);
    Ok(page_commands(handle, |page| {
        Ok(page.on_resize(to_millis(now), viewport, layout)?)
    })?)
}

/// Run due timers. Call at (or after) [`next_deadline`].
#[wasm_bindgen]
pub fn advance(handle: usize, now: f64) -> Result<String, JsError> {
    Ok(page_commands(handle, |page| Ok(page.advance(to_millis(now))))?)
}

/// Timestamp of the next pending timer, if any.
#[wasm_bindgen]
pub fn next_deadline(handle: usize) -> Result<Option<f64>, JsError> {
    Ok(with_page(handle, |page| {
        Ok(page.next_deadline().map(|at| at as f64))
    })?)
}

#[wasm_bindgen]
pub fn toggle_menu(handle: usize) -> Result<String, JsError> {
    Ok(page_commands(handle, |page| Ok(page.toggle_menu()))?)
}

/// A nav link was clicked; `href` is its raw attribute (`"#about"`).
#[wasm_bindgen]
pub fn click_nav_link(handle: usize, href: &str) -> Result<String, JsError> {
    Ok(page_commands(handle, |page| Ok(page.click_nav_link(href)))?)
}

#[wasm_bindgen]
pub fn click_scroll_top(handle: usize) -> Result<String, JsError> {
    Ok(page_commands(handle, |page| Ok(page.click_scroll_top()))?)
}

/// Submit the contact form; `fields_json` is an object with `name`,
/// `email`, `subject`, `message` and the `company` honeypot.
#[wasm_bindgen]
pub fn submit_contact(handle: usize, now: f64, fields_json: &str) -> Result<String, JsError> {
    let fields: ContactFields = serde_json::from_str(fields_json).map_err(BridgeError::from)?;
    Ok(page_commands(handle, |page| {
        Ok(page.submit_contact(to_millis(now), &fields))
    })?)
}

/// Report the outcome of the last `send_mail` command.
#[wasm_bindgen]
pub fn mail_delivered(handle: usize, ok: bool) -> Result<String, JsError> {
    Ok(page_commands(handle, |page| Ok(page.mail_delivered(ok)))?)
}
