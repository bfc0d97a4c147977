//! Chat widget state. Sending is split into `begin_send`/`finish_send` so the
//! web layer never holds a borrow across the relay call.

use crate::error::RelayError;
use crate::relay::{send_chat, submit_contact, ChatReply, ContactRequest, RelayConfig, RelayTransport};

pub const GREETING: &str =
    "Hi! I'm Farhan's AI assistant. Ask me anything about his skills, projects, or experience.";
pub const GREETING_REPLIES: [&str; 3] = ["Hire Farhan", "View Portfolio", "Contact"];
pub const FALLBACK_REPLY: &str =
    "Oops! The server isn't responding right now. Try again in a moment or contact Farhan directly.";
pub const FALLBACK_REPLIES: [&str; 3] = ["Hire Farhan", "Portfolio", "Contact"];
pub const LEAD_KEYWORDS: [&str; 6] = [
    "hire",
    "contact",
    "connect",
    "work together",
    "collaborate",
    "project",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub quick_replies: Vec<String>,
}

pub fn wants_lead(text: &str) -> bool {
    let lower = text.to_lowercase();
    LEAD_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    loading: bool,
    lead_form: bool,
    lead_captured: bool,
    pub speak_replies: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut s = Self {
            messages: Vec::new(),
            next_id: 1,
            loading: false,
            lead_form: false,
            lead_captured: false,
            speak_replies: false,
        };
        s.push(Role::Assistant, GREETING.to_string(), to_owned(&GREETING_REPLIES));
        s
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn lead_form_visible(&self) -> bool {
        self.lead_form
    }

    pub fn lead_captured(&self) -> bool {
        self.lead_captured
    }

    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    fn push(&mut self, role: Role, content: String, quick_replies: Vec<String>) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            quick_replies,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Records the user's message and returns the text to relay, or `None`
    /// for blank input or while a reply is pending. Shows the lead form
    /// first when the message asks to get in touch.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.loading {
            return None;
        }
        if wants_lead(text) && !self.lead_captured {
            self.lead_form = true;
            log::info!("[chat] lead form shown");
        }
        self.push(Role::User, text.to_string(), Vec::new());
        self.loading = true;
        Some(text.to_string())
    }

    /// Appends the relay's reply, or the fallback when the relay failed.
    pub fn finish_send(&mut self, result: Result<ChatReply, RelayError>) -> &ChatMessage {
        self.loading = false;
        match result {
            Ok(r) => self.push(Role::Assistant, r.text, r.quick_replies),
            Err(e) => {
                log::warn!("[chat] relay failed: {}", e);
                self.push(
                    Role::Assistant,
                    FALLBACK_REPLY.to_string(),
                    to_owned(&FALLBACK_REPLIES),
                )
            }
        }
    }

    /// Builds the contact relay payload for a lead.
    pub fn lead_request(&self, name: &str, email: &str) -> Result<ContactRequest, RelayError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(RelayError::Invalid("name and email are required"));
        }
        let said: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        Ok(ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: format!("Lead from the chat assistant.\n\n{}", said.join("\n")),
        })
    }

    /// Returns true when the lead was captured.
    pub fn finish_lead(&mut self, name: &str, result: Result<String, RelayError>) -> bool {
        match result {
            Ok(_) => {
                self.lead_captured = true;
                self.lead_form = false;
                self.push(
                    Role::Assistant,
                    format!(
                        "Thank you {}! I've saved your information. Farhan will follow up soon.",
                        name.trim()
                    ),
                    Vec::new(),
                );
                log::info!("[chat] lead captured");
                true
            }
            Err(e) => {
                log::warn!("[chat] lead not saved: {}", e);
                false
            }
        }
    }

    pub fn dismiss_lead_form(&mut self) {
        self.lead_form = false;
    }
}

fn to_owned(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

/// Send and await the reply in one go, for callers that own the session.
pub async fn exchange<'s, T: RelayTransport>(
    session: &'s mut ChatSession,
    transport: &T,
    cfg: &RelayConfig,
    text: &str,
) -> Option<&'s ChatMessage> {
    let msg = session.begin_send(text)?;
    let result = send_chat(transport, cfg, &msg).await;
    Some(session.finish_send(result))
}

pub async fn capture_lead<T: RelayTransport>(
    session: &mut ChatSession,
    transport: &T,
    cfg: &RelayConfig,
    name: &str,
    email: &str,
) -> bool {
    let req = match session.lead_request(name, email) {
        Ok(r) => r,
        Err(_) => return false,
    };
    let result = submit_contact(transport, cfg, &req).await;
    session.finish_lead(name, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_greeting() {
        let s = ChatSession::new();
        assert_eq!(s.messages().len(), 1);
        let g = &s.messages()[0];
        assert_eq!(g.role, Role::Assistant);
        assert_eq!(g.content, GREETING);
        assert_eq!(g.quick_replies, GREETING_REPLIES);
    }

    #[test]
    fn blank_and_overlapping_sends_are_ignored() {
        let mut s = ChatSession::new();
        assert_eq!(s.begin_send("   "), None);
        assert_eq!(s.begin_send(" hello "), Some("hello".into()));
        assert_eq!(s.begin_send("again"), None);
        assert_eq!(s.messages().len(), 2);
    }

    #[test]
    fn lead_keywords_are_case_insensitive() {
        assert!(wants_lead("Can we WORK TOGETHER?"));
        assert!(wants_lead("nice Project"));
        assert!(!wants_lead("what stack do you use"));
    }

    #[test]
    fn relay_failure_yields_fallback() {
        let mut s = ChatSession::new();
        s.begin_send("hello");
        let m = s.finish_send(Err(RelayError::Network("offline".into())));
        assert_eq!(m.content, FALLBACK_REPLY);
        assert_eq!(m.quick_replies, FALLBACK_REPLIES);
        assert!(!s.loading());
    }

    #[test]
    fn captured_lead_suppresses_form() {
        let mut s = ChatSession::new();
        assert!(s.finish_lead("Jane", Ok("ok".into())));
        assert!(s.lead_captured());
        assert!(s.last_assistant().unwrap().content.starts_with("Thank you Jane!"));
        s.begin_send("hire Farhan");
        assert!(!s.lead_form_visible());
    }

    #[test]
    fn lead_request_needs_name_and_email() {
        let mut s = ChatSession::new();
        s.begin_send("collaborate?");
        assert!(s.lead_request(" ", "a@b.c").is_err());
        let req = s.lead_request("Jane", "jane@x.com").unwrap();
        assert!(req.message.ends_with("collaborate?"));
    }
}
