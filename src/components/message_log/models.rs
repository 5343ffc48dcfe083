use serde::{Deserialize, Serialize};

/// Who produced a message in the conversation log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    /// Create a message spoken by the user
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a message spoken by the assistant
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    /// CSS class used when rendering the log page
    pub fn sender_class(&self) -> &'static str {
        match self.sender {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Display name used when rendering the log page
    pub fn sender_label(&self) -> &'static str {
        match self.sender {
            Sender::User => "You",
            Sender::Bot => "Alfred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_sender() {
        let user = Message::user("hello");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "hello");

        let bot = Message::bot("hi there");
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.sender_label(), "Alfred");
        assert_eq!(bot.sender_class(), "bot");
    }
}
