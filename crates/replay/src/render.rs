use folio_protocol::DomCommand;

use crate::scenario::Emitted;

/// One-line human summary of a command.
pub fn describe(command: &DomCommand) -> String {
    match command {
        DomCommand::SetLinkActive { section, active } => {
            let state = if *active { "on " } else { "off" };
            format!("nav    {state} {}", section.anchor())
        }
        DomCommand::SetPendingStyle {
            element,
            opacity,
            translate_y,
            ..
        } => format!("reveal pending {element} (opacity {opacity}, +{translate_y}px)"),
        DomCommand::PlayReveal { element, class } => format!("reveal play {element} .{class}"),
        DomCommand::SetProgressWidth { element, percent } => {
            format!("skill  {element} → {percent}%")
        }
        DomCommand::SetScrollTopVisible { visible } => {
            format!("top    {}", if *visible { "show" } else { "hide" })
        }
        DomCommand::ScrollTo { top, smooth } => {
            format!("scroll to {top}{}", if *smooth { " (smooth)" } else { "" })
        }
        DomCommand::SetMenuOpen { open } => {
            format!("menu   {}", if *open { "open" } else { "closed" })
        }
        DomCommand::RevealGreeting => "hero   greeting".to_string(),
        DomCommand::ClearHeroText => "hero   clear".to_string(),
        DomCommand::AppendHeroChar { ch, .. } => format!("hero   type {ch:?}"),
        DomCommand::SetHeroText { text } => format!("hero   set {text:?}"),
        DomCommand::MarkTypingShown => "hero   mark shown".to_string(),
        DomCommand::SetSubmitBusy { busy } => {
            format!("form   {}", if *busy { "busy" } else { "ready" })
        }
        DomCommand::SendMail {
            service, template, ..
        } => format!("mail   {service}/{template}"),
        DomCommand::ResetContactForm => "form   reset".to_string(),
        DomCommand::ShowToast { message, kind } => format!("toast  [{}] {message}", kind.class()),
    }
}

pub fn text_line(emitted: &Emitted) -> String {
    format!("{:>7}ms  {}", emitted.at, describe(&emitted.command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::ToastKind;

    #[test]
    fn describes_commands() {
        let line = text_line(&Emitted {
            at: 1_100,
            command: DomCommand::SetLinkActive {
                section: "skills".into(),
                active: true,
            },
        });
        assert_eq!(line, "   1100ms  nav    on  #skills");
        assert_eq!(
            describe(&DomCommand::ShowToast {
                message: "Hi".into(),
                kind: ToastKind::Success,
            }),
            "toast  [notification-success] Hi"
        );
    }
}
