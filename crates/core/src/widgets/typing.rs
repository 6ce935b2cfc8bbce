//! Hero "typewriter" effect.
//!
//! Plays once per browser session. Whether it already played is read once
//! at construction from the host's session storage; when it finishes the
//! effect asks the host to persist the flag.

use folio_protocol::DomCommand;
use log::debug;

use crate::config::TypingConfig;
use crate::timer::Millis;

/// Deferred work the effect asks its owner to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingStep {
    RevealGreeting,
    TypeNext,
}

#[derive(Debug, Clone)]
pub struct TypingEffect {
    text: Vec<char>,
    config: TypingConfig,
    already_shown: bool,
    typed: usize,
    started: bool,
    done: bool,
}

impl TypingEffect {
    pub fn new(config: TypingConfig, already_shown: bool) -> Self {
        Self {
            text: config.text.chars().collect(),
            config,
            already_shown,
            typed: 0,
            started: false,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Kick the effect off at `now`.
    ///
    /// Returns the immediate commands plus the steps to schedule. A second
    /// call does nothing.
    pub fn start(&mut self, now: Millis) -> (Vec<DomCommand>, Vec<(Millis, TypingStep)>) {
        if self.started {
            return (Vec::new(), Vec::new());
        }
        self.started = true;

        if self.already_shown {
            debug!("typing effect skipped: already shown this session");
            self.done = true;
            return (
                vec![
                    DomCommand::RevealGreeting,
                    DomCommand::SetHeroText {
                        text: self.config.text.clone(),
                    },
                ],
                Vec::new(),
            );
        }

        (
            vec![DomCommand::ClearHeroText],
            vec![
                (
                    now + self.config.greeting_delay_ms,
                    TypingStep::RevealGreeting,
                ),
                (now + self.config.start_delay_ms, TypingStep::TypeNext),
            ],
        )
    }

    /// Run a previously scheduled step.
    pub fn step(
        &mut self,
        now: Millis,
        step: TypingStep,
    ) -> (Option<DomCommand>, Option<(Millis, TypingStep)>) {
        match step {
            TypingStep::RevealGreeting => (Some(DomCommand::RevealGreeting), None),
            TypingStep::TypeNext if self.done => (None, None),
            TypingStep::TypeNext => match self.text.get(self.typed).copied() {
                Some(ch) => {
                    self.typed += 1;
                    (
                        Some(DomCommand::AppendHeroChar {
                            ch,
                            letter: ch != ' ',
                        }),
                        Some((now + self.config.char_interval_ms, TypingStep::TypeNext)),
                    )
                }
                None => {
                    self.done = true;
                    debug!("typing effect finished");
                    (Some(DomCommand::MarkTypingShown), None)
                }
            },
        }
    }
}
