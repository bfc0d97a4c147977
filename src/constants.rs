// DOM hooks and timings for the browser layer.

// Backgrounds
pub const EFFECT_SELECTOR: &str = "canvas[data-effect]";
pub const EFFECT_ATTR: &str = "data-effect";
pub const INITIALS_ATTR: &str = "data-initials";
pub const COUNT_ATTR: &str = "data-count";
pub const SEED_ATTR: &str = "data-seed";
pub const HACK_BUTTON_ATTR: &str = "data-system-hack"; // button whose click fires the glitch hack

// Relay base override, read from <body>
pub const API_BASE_ATTR: &str = "data-api-base";

// Speed hint
pub const HINT_ID: &str = "speed-hint";
pub const HINT_HIDE_MS: i32 = 1500;

// Chat widget
pub const CHAT_FORM_ID: &str = "chat-form";
pub const CHAT_INPUT_ID: &str = "chat-input";
pub const CHAT_LOG_ID: &str = "chat-log";
pub const CHAT_SPEAK_ID: &str = "chat-speak";
pub const CHAT_MIC_ID: &str = "chat-mic";
pub const LEAD_FORM_ID: &str = "chat-lead";
pub const LEAD_NAME_ID: &str = "lead-name";
pub const LEAD_EMAIL_ID: &str = "lead-email";
pub const LEAD_DISMISS_ID: &str = "lead-dismiss";

// Contact form
pub const CONTACT_FORM_ID: &str = "contact-form";
pub const CONTACT_NAME_ID: &str = "contact-name";
pub const CONTACT_EMAIL_ID: &str = "contact-email";
pub const CONTACT_SUBJECT_ID: &str = "contact-subject";
pub const CONTACT_MESSAGE_ID: &str = "contact-message";
pub const CONTACT_STATUS_ID: &str = "contact-status";

pub const HIDDEN_CLASS: &str = "hidden";
pub const VOICE_LANG: &str = "en-US";
