// End-to-end flows for the chat widget and contact form against a mocked
// relay. Futures are driven to completion with pollster.

mod common;

use common::MockRelay;
use folio_core::chat::{self, ChatSession, Role, FALLBACK_REPLY};
use folio_core::contact::{self, ContactForm, ContactStatus};
use folio_core::relay::{send_chat, RelayConfig};
use serde_json::json;

#[test]
fn contact_form_success_shows_confirmation_and_clears_fields() {
    let relay = MockRelay::json(200, json!({"message": "Message sent successfully!"}));
    let cfg = RelayConfig::default();
    let mut form = ContactForm::default();
    form.name = "Jane".into();
    form.email = "jane@x.com".into();
    form.message = "Hi".into();

    let status = pollster::block_on(contact::submit(&mut form, &relay, &cfg, 0.0)).clone();

    assert_eq!(status, ContactStatus::Sent("Message sent successfully!".into()));
    assert!(form.name.is_empty() && form.email.is_empty() && form.message.is_empty());
    let sent = relay.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "/api/contact");
    assert_eq!(
        sent[0].1,
        json!({"name": "Jane", "email": "jane@x.com", "message": "Hi"})
    );
}

#[test]
fn contact_form_surfaces_relay_error_verbatim() {
    let relay = MockRelay::json(500, json!({"error": "Email service unavailable"}));
    let mut form = ContactForm::default();
    form.name = "Jane".into();
    form.email = "jane@x.com".into();
    form.message = "Hi".into();
    let status =
        pollster::block_on(contact::submit(&mut form, &relay, &RelayConfig::default(), 0.0)).clone();
    assert_eq!(status, ContactStatus::Failed("Email service unavailable".into()));
    assert_eq!(form.name, "Jane");
}

#[test]
fn invalid_contact_form_never_reaches_the_relay() {
    let relay = MockRelay::json(200, json!({}));
    let mut form = ContactForm::default();
    form.name = "Jane".into();
    form.email = "not-an-email".into();
    form.message = "Hi".into();
    pollster::block_on(contact::submit(&mut form, &relay, &RelayConfig::default(), 0.0));
    assert!(relay.sent.borrow().is_empty());
    assert!(matches!(form.status(), ContactStatus::Failed(_)));
}

#[test]
fn hire_request_shows_lead_form_before_reply() {
    let relay = MockRelay::json(200, json!({"response": "Farhan is available!", "quickReplies": ["Pricing"]}));
    let cfg = RelayConfig::default();
    let mut session = ChatSession::new();

    let outgoing = session.begin_send("hire Farhan").unwrap();
    // lead form is up while the reply is still pending
    assert!(session.lead_form_visible());
    assert!(session.loading());
    assert_eq!(session.last_assistant().unwrap().content, chat::GREETING);

    let result = pollster::block_on(send_chat(&relay, &cfg, &outgoing));
    let reply = session.finish_send(result);
    assert_eq!(reply.content, "Farhan is available!");
    assert_eq!(reply.quick_replies, vec!["Pricing"]);
    assert!(session.lead_form_visible());
    assert_eq!(relay.sent.borrow()[0].1, json!({"message": "hire Farhan"}));
}

#[test]
fn lead_capture_goes_through_contact_relay() {
    let relay = MockRelay::json(200, json!({"message": "Message sent successfully!"}));
    let cfg = RelayConfig::with_base(Some("https://relay.example/api"));
    let mut session = ChatSession::new();
    session.begin_send("let's collaborate");
    session.finish_send(Ok(folio_core::relay::ChatReply {
        text: "Sure".into(),
        quick_replies: vec![],
    }));

    let ok = pollster::block_on(chat::capture_lead(&mut session, &relay, &cfg, "Jane", "jane@x.com"));
    assert!(ok);
    assert!(session.lead_captured());
    assert!(!session.lead_form_visible());
    let sent = relay.sent.borrow();
    assert_eq!(sent[0].0, "https://relay.example/api/contact");
    assert!(sent[0].1["message"].as_str().unwrap().contains("let's collaborate"));
}

#[test]
fn offline_chat_relay_yields_fallback_message() {
    let relay = MockRelay::offline();
    let mut session = ChatSession::new();
    let reply = pollster::block_on(chat::exchange(
        &mut session,
        &relay,
        &RelayConfig::default(),
        "what do you build?",
    ))
    .unwrap()
    .clone();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, FALLBACK_REPLY);
    assert!(!session.lead_form_visible());
}

#[test]
fn non_success_status_is_a_relay_failure() {
    let relay = MockRelay::json(503, json!({"response": "should not show"}));
    let mut session = ChatSession::new();
    let reply = pollster::block_on(chat::exchange(
        &mut session,
        &relay,
        &RelayConfig::default(),
        "hello",
    ))
    .unwrap()
    .clone();
    assert_eq!(reply.content, FALLBACK_REPLY);
}
