//! Notification message composition
//!
//! Each participant gets one plain-text message naming only their own
//! receiver. Messages render to RFC 5322 text suitable for a
//! sendmail-compatible command's stdin.

use std::fmt::Write as _;

use crate::config::NotifierConfig;
use crate::draw::roster::Participant;
use crate::notify::template::{expand_template, message_vars};

/// Longest encoded-word allowed by RFC 2047
const MAX_ENCODED_WORD: usize = 75;
const WORD_PREFIX: &str = "=?utf-8?Q?";
const WORD_SUFFIX: &str = "?=";

/// A composed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier of the giver this message is for
    pub giver: String,
    /// Recipient address
    pub to: String,
    /// Sender address
    pub from: String,
    /// Subject line (unencoded)
    pub subject: String,
    /// Body text (unencoded, `\n` line endings)
    pub body: String,
}

impl Message {
    /// Compose the message telling `giver` whom they drew
    #[must_use]
    pub fn compose(giver: &Participant, receiver: &str, config: &NotifierConfig) -> Self {
        let vars = message_vars(&giver.id, &giver.address, receiver);
        Self {
            giver: giver.id.clone(),
            to: giver.address.clone(),
            from: config.mailer.sender.clone(),
            subject: expand_template(&config.message.subject, &vars),
            body: expand_template(&config.message.body, &vars),
        }
    }

    /// Render as RFC 5322 text with CRLF line endings
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "From: {}\r\n", self.from);
        let _ = write!(out, "To: {}\r\n", self.to);
        let _ = write!(out, "Subject: {}\r\n", encode_header(&self.subject));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        out.push_str("Content-Transfer-Encoding: 8bit\r\n");
        out.push_str("\r\n");
        for line in self.body.lines() {
            out.push_str(line);
            out.push_str("\r\n");
        }
        out
    }
}

/// Encode a header value as RFC 2047 Q encoded-words when it is not plain ASCII
#[must_use]
pub fn encode_header(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return value.to_string();
    }

    let budget = MAX_ENCODED_WORD - WORD_PREFIX.len() - WORD_SUFFIX.len();

    let mut words = Vec::new();
    let mut current = String::new();
    for c in value.chars() {
        let encoded = q_encode_char(c);
        if current.len() + encoded.len() > budget && !current.is_empty() {
            words.push(format!("{WORD_PREFIX}{current}{WORD_SUFFIX}"));
            current.clear();
        }
        current.push_str(&encoded);
    }
    if !current.is_empty() {
        words.push(format!("{WORD_PREFIX}{current}{WORD_SUFFIX}"));
    }

    words.join("\r\n ")
}

fn q_encode_char(c: char) -> String {
    match c {
        ' ' => "_".to_string(),
        'a'..='z' | 'A'..='Z' | '0'..='9' | '!' | '*' | '+' | '-' | '/' => c.to_string(),
        _ => {
            let mut buf = [0u8; 4];
            let mut encoded = String::new();
            for b in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(encoded, "={b:02X}");
            }
            encoded
        }
    }
}
