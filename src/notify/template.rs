//! Placeholder expansion for message and command templates.
//!
//! Supports `{{name}}` syntax. Unknown names are left as-is.

use std::collections::HashMap;

use crate::config::MailerConfig;

/// Expand `{{name}}` placeholders in `template`.
///
/// A placeholder whose name is empty or contains whitespace, or that has no
/// closing `}}`, is emitted literally.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            result.push_str(&rest[open..]);
            return result;
        };

        let name = &after_open[..close];
        if name.is_empty() || name.contains(char::is_whitespace) {
            result.push_str("{{");
            rest = after_open;
            continue;
        }

        match vars.get(name) {
            Some(value) => result.push_str(value),
            None => result.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    result.push_str(rest);
    result
}

/// Variables available to subject and body templates
#[must_use]
pub fn message_vars(giver: &str, giver_address: &str, receiver: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("giver".to_string(), giver.to_string());
    vars.insert("giver_address".to_string(), giver_address.to_string());
    vars.insert("receiver".to_string(), receiver.to_string());
    vars
}

/// Variables available to mail command arguments. The password is never included.
#[must_use]
pub fn command_vars(mailer: &MailerConfig) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("server".to_string(), mailer.server.clone());
    vars.insert("port".to_string(), mailer.port.to_string());
    vars.insert("username".to_string(), mailer.username.clone());
    vars.insert("sender".to_string(), mailer.sender.clone());
    vars
}
