use chrono::{DateTime, Local};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
    System,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Bot => "Bot",
            Speaker::System => "--",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Everything shown in the chat area, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    lines: Vec<ChatLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.lines.push(ChatLine {
            speaker,
            text: text.into(),
            at: Local::now(),
        });
    }

    pub fn user(&mut self, text: impl Into<String>) {
        self.push(Speaker::User, text);
    }

    pub fn bot(&mut self, text: impl Into<String>) {
        self.push(Speaker::Bot, text);
    }

    pub fn system(&mut self, text: impl Into<String>) {
        self.push(Speaker::System, text);
    }

    pub fn lines(&self) -> &[ChatLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&ChatLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
