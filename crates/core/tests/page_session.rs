//! Integration test: drive a full page session the way the browser host
//! does (config and layout as JSON, then scroll, timer and click events)
//! and check the DOM commands that come out.

use folio_core::layout::parse_layout;
use folio_core::reveal::{RegisterOutcome, RevealKind, RevealState, parse_width_percent};
use folio_core::widgets::ContactFields;
use folio_core::{Page, PageConfig};
use folio_protocol::{DomCommand, ToastKind, Viewport};

const LAYOUT: &str = r#"{
    "sections": [
        {"id": "home",    "top": 0,    "height": 800},
        {"id": "about",   "top": 800,  "height": 900},
        {"id": "skills",  "top": 1700, "height": 1100},
        {"id": "contact", "top": 2800, "height": 700}
    ],
    "elements": {
        "about-content":   {"top": 880,  "height": 500},
        "timeline-item-1": {"top": 1300, "height": 300},
        "skill-rust":      {"top": 2000, "height": 12},
        "skill-ts":        {"top": 2040, "height": 12}
    }
}"#;

const CONFIG: &str = r#"{
    "contact": {
        "service": "service_portfolio",
        "owner_template": "template_owner",
        "reply_template": "template_reply"
    }
}"#;

fn vp(scroll_y: f64) -> Viewport {
    Viewport::new(scroll_y, 800.0)
}

fn new_page(typing_shown: bool) -> Page {
    let config = PageConfig::from_json(CONFIG).expect("config parses");
    let mut page = Page::new(config, typing_shown).expect("config is valid");
    page.set_layout(parse_layout(LAYOUT).expect("layout parses"))
        .expect("layout is valid");
    page.set_nav_links(["#home", "#about", "#skills", "#contact"]);
    page
}

fn active_link(cmds: &[DomCommand]) -> Option<String> {
    cmds.iter().rev().find_map(|c| match c {
        DomCommand::SetLinkActive {
            section,
            active: true,
        } => Some(section.to_string()),
        _ => None,
    })
}

fn count<F: Fn(&DomCommand) -> bool>(cmds: &[DomCommand], pred: F) -> usize {
    cmds.iter().filter(|c| pred(c)).count()
}

#[test]
fn scroll_through_the_page() {
    let mut page = new_page(true);

    let mut cmds = Vec::new();
    for id in ["about-content", "timeline-item-1"] {
        let (outcome, pending) = page.register_reveal(id, RevealKind::Fade);
        assert_eq!(outcome, RegisterOutcome::Registered);
        cmds.extend(pending);
    }
    for (id, width) in [("skill-rust", "90%"), ("skill-ts", "75%")] {
        let percent = parse_width_percent(width).expect("width parses");
        let (outcome, _) = page.register_reveal(
            id,
            RevealKind::SkillBar {
                target_width_percent: percent,
            },
        );
        assert_eq!(outcome, RegisterOutcome::Registered);
    }
    assert_eq!(
        count(&cmds, |c| matches!(c, DomCommand::SetPendingStyle { .. })),
        2
    );

    let cmds = page.start(0, vp(0.0));
    assert_eq!(active_link(&cmds).as_deref(), Some("home"));

    // Smooth scroll down to the skills section, one event every 16ms.
    let mut all = Vec::new();
    let mut now = 1_000;
    let mut y = 0.0;
    while y < 1_900.0 {
        y += 40.0;
        now += 16;
        all.extend(page.on_scroll(now, vp(y)));
        if let Some(deadline) = page.next_deadline()
            && deadline <= now
        {
            all.extend(page.advance(now));
        }
    }
    all.extend(page.advance(now + 1_000));

    assert_eq!(
        page.activation().links().active().map(ToString::to_string),
        Some("skills".to_string())
    );
    assert_eq!(
        count(&all, |c| matches!(c, DomCommand::PlayReveal { .. })),
        2
    );
    let widths: Vec<_> = all
        .iter()
        .filter_map(|c| match c {
            DomCommand::SetProgressWidth { element, percent } => {
                Some((element.to_string(), *percent))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        widths,
        vec![("skill-rust".to_string(), 90.0), ("skill-ts".to_string(), 75.0)]
    );
    assert!(all.contains(&DomCommand::SetScrollTopVisible { visible: true }));

    // Never two active links at once: replay the highlight toggles.
    let mut active: Vec<String> = vec!["home".into()];
    for c in &all {
        if let DomCommand::SetLinkActive { section, active: on } = c {
            if *on {
                active.push(section.to_string());
            } else {
                active.retain(|s| s != section.as_str());
            }
            assert!(active.len() <= 1, "two active links: {active:?}");
        }
    }

    // Scroll back to the top: nothing replays.
    let back = page.on_scroll(now + 2_000, vp(0.0));
    let back: Vec<_> = back.into_iter().chain(page.advance(now + 3_000)).collect();
    assert_eq!(count(&back, |c| matches!(c, DomCommand::PlayReveal { .. })), 0);
    assert_eq!(active_link(&back).as_deref(), Some("home"));
    for id in ["about-content", "timeline-item-1", "skill-rust", "skill-ts"] {
        assert_eq!(page.reveal().state(id), Some(RevealState::Revealed));
    }
    assert_eq!(page.reveal().subscription_count(), 0);
}

#[test]
fn typing_effect_plays_then_marks_session() {
    let mut page = new_page(false);
    let cmds = page.start(0, vp(0.0));
    assert!(cmds.contains(&DomCommand::ClearHeroText));

    let mut typed = String::new();
    let mut marked = false;
    while let Some(deadline) = page.next_deadline() {
        for c in page.advance(deadline) {
            match c {
                DomCommand::AppendHeroChar { ch, .. } => typed.push(ch),
                DomCommand::MarkTypingShown => marked = true,
                _ => {}
            }
        }
    }
    assert_eq!(typed, "Web Developer");
    assert!(marked);
}

#[test]
fn contact_round_trip_through_page() {
    let mut page = new_page(true);
    let fields: ContactFields = serde_json::from_str(
        r#"{"name":"Grace","email":"grace@navy.mil","subject":"Hi","message":"Hello"}"#,
    )
    .expect("fields parse");

    let cmds = page.submit_contact(0, &fields);
    let Some(DomCommand::SendMail {
        service,
        template,
        params,
    }) = cmds.iter().find(|c| matches!(c, DomCommand::SendMail { .. }))
    else {
        panic!("expected a SendMail command, got {cmds:?}");
    };
    assert_eq!(service, "service_portfolio");
    assert_eq!(template, "template_owner");
    assert_eq!(params.get("from_email").map(String::as_str), Some("grace@navy.mil"));

    page.mail_delivered(true);
    let done = page.mail_delivered(true);
    assert!(done.contains(&DomCommand::ShowToast {
        message: "Message sent successfully!".into(),
        kind: ToastKind::Success,
    }));
    assert!(!page.contact().is_busy());
}
