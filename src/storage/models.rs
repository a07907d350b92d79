use super::StoreError;

/// Name given to players who never picked one.
pub const DEFAULT_USER: &str = "Unnamed";

/// Sanitized payload for a new chat row.
///
/// The text wire format uses tab and newline as separators, so neither may
/// ever reach the `chats` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    user: String,
    msg: String,
}

impl NewChatMessage {
    pub fn new(user: &str, msg: &str) -> Result<Self, StoreError> {
        let msg = sanitize_field(msg);
        if msg.is_empty() {
            return Err(StoreError::Rejected("message is empty".to_string()));
        }

        let user = match sanitize_field(user) {
            user if user.is_empty() => DEFAULT_USER.to_string(),
            user => user,
        };

        Ok(Self { user, msg })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

/// Replace every field/record delimiter with a space and trim the result.
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_become_spaces() {
        assert_eq!(sanitize_field("a\tb\nc\r\nd"), "a b c  d");
        assert_eq!(sanitize_field("\t padded \n"), "padded");
    }

    #[test]
    fn empty_message_is_rejected() {
        assert!(matches!(
            NewChatMessage::new("bob", " \n\t "),
            Err(StoreError::Rejected(_))
        ));
    }

    #[test]
    fn blank_user_falls_back_to_default_name() {
        let message = NewChatMessage::new("\t", "hello").unwrap();
        assert_eq!(message.user(), DEFAULT_USER);
        assert_eq!(message.msg(), "hello");
    }
}
