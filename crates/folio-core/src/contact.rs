use crate::error::RelayError;
use crate::relay::{submit_contact, ContactRequest, RelayConfig, RelayTransport};

pub const CONFIRMATION_SEC: f64 = 5.0;
pub const DEFAULT_FAILURE: &str = "Failed to send message.";
pub const MISSING_FIELDS: &str = "Please fill in your name, email and message.";
pub const BAD_EMAIL: &str = "Please enter a valid email address.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContactStatus {
    Idle,
    Sending,
    Sent(String),
    Failed(String),
}

#[derive(Debug)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    /// Shown in the form only; the relay takes name, email and message.
    pub subject: String,
    pub message: String,
    status: ContactStatus,
    sent_at: f64,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            status: ContactStatus::Idle,
            sent_at: 0.0,
        }
    }
}

impl ContactForm {
    pub fn status(&self) -> &ContactStatus {
        &self.status
    }

    pub fn validate(&self) -> Result<ContactRequest, &'static str> {
        let (name, email, message) = (self.name.trim(), self.email.trim(), self.message.trim());
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(MISSING_FIELDS);
        }
        if !email.contains('@') {
            return Err(BAD_EMAIL);
        }
        Ok(ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    /// Validates and moves to `Sending`. Returns the payload to relay, or
    /// `None` when invalid or already sending.
    pub fn begin_submit(&mut self) -> Option<ContactRequest> {
        if self.status == ContactStatus::Sending {
            return None;
        }
        match self.validate() {
            Ok(req) => {
                self.status = ContactStatus::Sending;
                Some(req)
            }
            Err(msg) => {
                self.status = ContactStatus::Failed(msg.to_string());
                None
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<String, RelayError>, now: f64) {
        match result {
            Ok(confirmation) => {
                log::info!("[contact] sent");
                self.name.clear();
                self.email.clear();
                self.subject.clear();
                self.message.clear();
                self.status = ContactStatus::Sent(confirmation);
                self.sent_at = now;
            }
            Err(e) => {
                log::warn!("[contact] {}", e);
                let msg = e.relay_message().unwrap_or_else(|| DEFAULT_FAILURE.to_string());
                self.status = ContactStatus::Failed(msg);
            }
        }
    }

    /// Hides the confirmation once it has been up long enough. `now` is in
    /// seconds on the same clock passed to `finish_submit`.
    pub fn tick(&mut self, now: f64) {
        if matches!(self.status, ContactStatus::Sent(_)) && now - self.sent_at >= CONFIRMATION_SEC {
            self.status = ContactStatus::Idle;
        }
    }
}

pub async fn submit<'a, T: RelayTransport>(
    form: &'a mut ContactForm,
    transport: &T,
    cfg: &RelayConfig,
    now: f64,
) -> &'a ContactStatus {
    if let Some(req) = form.begin_submit() {
        let result = submit_contact(transport, cfg, &req).await;
        form.finish_submit(result, now);
    }
    form.status()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            message: "Hi".into(),
            ..ContactForm::default()
        }
    }

    #[test]
    fn rejects_missing_fields_and_bad_email() {
        let mut f = filled();
        f.message = "  ".into();
        assert_eq!(f.begin_submit(), None);
        assert_eq!(f.status(), &ContactStatus::Failed(MISSING_FIELDS.into()));

        let mut f = filled();
        f.email = "jane.x.com".into();
        assert_eq!(f.begin_submit(), None);
        assert_eq!(f.status(), &ContactStatus::Failed(BAD_EMAIL.into()));
    }

    #[test]
    fn failure_surfaces_relay_error_or_default() {
        let mut f = filled();
        f.begin_submit();
        f.finish_submit(
            Err(RelayError::Status {
                status: 500,
                body: r#"{"error":"Mailbox full"}"#.into(),
            }),
            0.0,
        );
        assert_eq!(f.status(), &ContactStatus::Failed("Mailbox full".into()));
        assert_eq!(f.name, "Jane");

        f.begin_submit();
        f.finish_submit(Err(RelayError::Network("offline".into())), 0.0);
        assert_eq!(f.status(), &ContactStatus::Failed(DEFAULT_FAILURE.into()));
    }

    #[test]
    fn confirmation_hides_after_five_seconds() {
        let mut f = filled();
        f.begin_submit();
        assert_eq!(f.begin_submit(), None);
        f.finish_submit(Ok("sent".into()), 10.0);
        f.tick(14.9);
        assert_eq!(f.status(), &ContactStatus::Sent("sent".into()));
        f.tick(15.0);
        assert_eq!(f.status(), &ContactStatus::Idle);
    }
}
