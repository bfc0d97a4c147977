//! Clients for the two backend relays. The transport is abstract so the web
//! crate can plug in `fetch` and tests a canned responder.

use crate::error::RelayError;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "/api";
pub const CHAT_PATH: &str = "/chat";
pub const CONTACT_PATH: &str = "/contact";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl RelayConfig {
    /// Blank overrides fall back to the default base.
    pub fn with_base(base: Option<&str>) -> Self {
        match base.map(str::trim).filter(|b| !b.is_empty()) {
            Some(b) => Self {
                base_url: b.trim_end_matches('/').to_string(),
            },
            None => Self::default(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    pub fn contact_url(&self) -> String {
        format!("{}{}", self.base_url, CONTACT_PATH)
    }
}

/// Raw relay answer: HTTP status and body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

impl RelayResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait RelayTransport {
    /// POST `body` as `application/json` to `url`. One attempt, no retries.
    async fn post_json(&self, url: &str, body: &Value) -> Result<RelayResponse, RelayError>;
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub quick_replies: Vec<String>,
}

const REPLY_FIELDS: [&str; 7] = [
    "/response",
    "/reply",
    "/output/text",
    "/text",
    "/message",
    "/choices/0/message/content",
    "/choices/0/text",
];

const QUICK_REPLY_FIELDS: [&str; 3] = ["quickReplies", "quick_replies", "suggestions"];

/// Picks the reply text out of whatever shape the agent answered with.
pub fn normalize_chat_reply(v: &Value) -> ChatReply {
    let text = REPLY_FIELDS
        .iter()
        .filter_map(|p| v.pointer(p))
        .find_map(|f| f.as_str().filter(|s| !s.trim().is_empty()))
        .or_else(|| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| v.to_string());

    let quick_replies = QUICK_REPLY_FIELDS
        .iter()
        .filter_map(|k| v.get(*k).and_then(Value::as_array))
        .next()
        .map(|xs| {
            xs.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ChatReply {
        text,
        quick_replies,
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Value, RelayError> {
    serde_json::to_value(body).map_err(|e| RelayError::Decode(e.to_string()))
}

pub async fn send_chat<T: RelayTransport>(
    transport: &T,
    cfg: &RelayConfig,
    message: &str,
) -> Result<ChatReply, RelayError> {
    let body = encode(&ChatRequest { message })?;
    let resp = transport.post_json(&cfg.chat_url(), &body).await?;
    if !resp.ok() {
        return Err(RelayError::Status {
            status: resp.status,
            body: resp.body,
        });
    }
    let reply = match serde_json::from_str::<Value>(&resp.body) {
        Ok(v) => normalize_chat_reply(&v),
        Err(_) => ChatReply {
            text: resp.body,
            quick_replies: Vec::new(),
        },
    };
    log::debug!("[chat] reply {} chars", reply.text.len());
    Ok(reply)
}

pub const CONTACT_SENT: &str = "Message sent successfully!";

/// Returns the relay's confirmation text.
pub async fn submit_contact<T: RelayTransport>(
    transport: &T,
    cfg: &RelayConfig,
    req: &ContactRequest,
) -> Result<String, RelayError> {
    let body = encode(req)?;
    let resp = transport.post_json(&cfg.contact_url(), &body).await?;
    if !resp.ok() {
        return Err(RelayError::Status {
            status: resp.status,
            body: resp.body,
        });
    }
    let msg = serde_json::from_str::<Value>(&resp.body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| CONTACT_SENT.to_string());
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_chain_prefers_earlier_fields() {
        let r = normalize_chat_reply(&json!({"reply": "b", "response": "a"}));
        assert_eq!(r.text, "a");
        let r = normalize_chat_reply(&json!({"output": {"text": "nested"}}));
        assert_eq!(r.text, "nested");
        let r = normalize_chat_reply(&json!({"choices": [{"message": {"content": "oa"}}]}));
        assert_eq!(r.text, "oa");
        let r = normalize_chat_reply(&json!({"choices": [{"text": "legacy"}]}));
        assert_eq!(r.text, "legacy");
    }

    #[test]
    fn reply_falls_back_to_bare_string_then_raw() {
        assert_eq!(normalize_chat_reply(&json!("plain")).text, "plain");
        let raw = json!({"weird": 1});
        assert_eq!(normalize_chat_reply(&raw).text, raw.to_string());
        // blank fields do not win over later ones
        assert_eq!(normalize_chat_reply(&json!({"response": " ", "text": "t"})).text, "t");
    }

    #[test]
    fn quick_replies_accept_aliases() {
        let r = normalize_chat_reply(&json!({"response": "x", "suggestions": ["a", 3, "b"]}));
        assert_eq!(r.quick_replies, vec!["a", "b"]);
        let r = normalize_chat_reply(&json!({"response": "x", "quick_replies": ["q"]}));
        assert_eq!(r.quick_replies, vec!["q"]);
        assert!(normalize_chat_reply(&json!({"response": "x"})).quick_replies.is_empty());
    }

    #[test]
    fn config_trims_base() {
        assert_eq!(RelayConfig::with_base(None).chat_url(), "/api/chat");
        assert_eq!(RelayConfig::with_base(Some("  ")).contact_url(), "/api/contact");
        assert_eq!(
            RelayConfig::with_base(Some("https://relay.example/api/")).chat_url(),
            "https://relay.example/api/chat"
        );
    }
}
