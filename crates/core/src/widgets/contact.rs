//! Contact form submission flow.
//!
//! Delivery happens outside the core: the form emits `SendMail` commands
//! and waits for the host to report each outcome through
//! [`ContactForm::delivered`]. Two deliveries run back to back, the message
//! to the site owner first and the auto-reply to the sender second.

use std::collections::BTreeMap;

use folio_protocol::{DomCommand, ToastKind};
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ContactConfig;

#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const SENT_MESSAGE: &str = "Message sent successfully!";
const FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    /// The hidden `company` field was filled in, which only bots do.
    #[error("honeypot field filled")]
    Honeypot,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid email address")]
    InvalidEmail,
}

impl ContactError {
    /// Text shown to the visitor, or `None` when the submission should be
    /// dropped without feedback.
    pub fn toast_message(&self) -> Option<&'static str> {
        match self {
            Self::Honeypot => None,
            Self::MissingField(_) => Some("Please fill in all fields."),
            Self::InvalidEmail => Some("Please enter a valid email address."),
        }
    }
}

/// Raw form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Honeypot, hidden from humans.
    pub company: String,
}

impl ContactFields {
    /// Validate and flatten into the template parameters the mail relay
    /// expects.
    pub fn to_params(&self) -> Result<BTreeMap<String, String>, ContactError> {
        if !self.company.is_empty() {
            return Err(ContactError::Honeypot);
        }
        let required = [
            ("name", "from_name", &self.name),
            ("email", "from_email", &self.email),
            ("subject", "subject", &self.subject),
            ("message", "message", &self.message),
        ];
        for (field, _, value) in &required {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(*field));
            }
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(required
            .into_iter()
            .map(|(_, key, value)| (key.to_string(), value.trim().to_string()))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    SendingOwner { params: BTreeMap<String, String> },
    SendingReply,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    relay: Option<ContactConfig>,
    phase: Phase,
}

impl ContactForm {
    pub fn new(relay: Option<ContactConfig>) -> Self {
        Self {
            relay,
            phase: Phase::Idle,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Handle a submit. Ignored while a previous submission is in flight.
    pub fn submit(&mut self, fields: &ContactFields) -> Vec<DomCommand> {
        if self.is_busy() {
            trace!("contact submit ignored: delivery in flight");
            return Vec::new();
        }

        let params = match fields.to_params() {
            Ok(params) => params,
            Err(err) => {
                debug!("contact submit rejected: {err}");
                return err
                    .toast_message()
                    .map(|message| toast(message, ToastKind::Error))
                    .into_iter()
                    .collect();
            }
        };

        let Some(relay) = &self.relay else {
            warn!("contact submit with no mail relay configured");
            return vec![toast(FAILED_MESSAGE, ToastKind::Error)];
        };

        let send = send_mail(relay, &relay.owner_template, params.clone());
        self.phase = Phase::SendingOwner { params };
        debug!("contact: sending to owner");
        vec![DomCommand::SetSubmitBusy { busy: true }, send]
    }

    /// Outcome of the most recent `SendMail`. Reports with nothing in
    /// flight are ignored.
    pub fn delivered(&mut self, ok: bool) -> Vec<DomCommand> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match (phase, ok) {
            (Phase::Idle, _) => {
                trace!("delivery report with nothing in flight");
                Vec::new()
            }
            (Phase::SendingOwner { params }, true) => match &self.relay {
                Some(relay) => {
                    debug!("contact: owner delivered, sending auto-reply");
                    let send = send_mail(relay, &relay.reply_template, params);
                    self.phase = Phase::SendingReply;
                    vec![send]
                }
                None => finish(false),
            },
            (Phase::SendingReply, true) => {
                debug!("contact: auto-reply delivered");
                finish(true)
            }
            (_, false) => {
                warn!("contact: mail delivery failed");
                finish(false)
            }
        }
    }
}

fn send_mail(relay: &ContactConfig, template: &str, params: BTreeMap<String, String>) -> DomCommand {
    DomCommand::SendMail {
        service: relay.service.clone(),
        template: template.to_string(),
        params,
    }
}

fn toast(message: &str, kind: ToastKind) -> DomCommand {
    DomCommand::ShowToast {
        message: message.to_string(),
        kind,
    }
}

fn finish(success: bool) -> Vec<DomCommand> {
    let mut commands = Vec::with_capacity(3);
    if success {
        commands.push(toast(SENT_MESSAGE, ToastKind::Success));
        commands.push(DomCommand::ResetContactForm);
    } else {
        commands.push(toast(FAILED_MESSAGE, ToastKind::Error));
    }
    commands.push(DomCommand::SetSubmitBusy { busy: false });
    commands
}
