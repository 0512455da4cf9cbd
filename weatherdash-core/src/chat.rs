/// Text of the provisional bot turn shown while a reply is outstanding.
pub const THINKING: &str = "Thinking...";

/// Shown in place of a reply when the chatbot request fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub provisional: bool,
}

/// Handle for a provisional turn awaiting its reply.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingReply {
    id: String,
}

impl PendingReply {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Append-only transcript. Lives for the session only.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    next_id: u64,
    outstanding: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_waiting(&self) -> bool {
        self.outstanding
    }

    /// Appends the user's message and a provisional bot turn. Returns `None`
    /// (and appends nothing) for a blank message or while a reply is still
    /// outstanding.
    pub fn begin(&mut self, message: &str) -> Option<PendingReply> {
        let message = message.trim();
        if message.is_empty() || self.outstanding {
            return None;
        }

        self.push(Sender::User, message.to_string(), false);
        let id = self.push(Sender::Bot, THINKING.to_string(), true);
        self.outstanding = true;

        Some(PendingReply { id })
    }

    /// Replaces the provisional turn with the final reply.
    pub fn resolve(&mut self, pending: PendingReply, text: impl Into<String>) {
        let text = text.into();
        match self.turns.iter_mut().find(|t| t.id == pending.id) {
            Some(turn) => {
                turn.text = text;
                turn.provisional = false;
            }
            None => {
                self.push(Sender::Bot, text, false);
            }
        }
        self.outstanding = false;
    }

    fn push(&mut self, sender: Sender, text: String, provisional: bool) -> String {
        self.next_id += 1;
        let id = format!("msg-{}", self.next_id);
        self.turns.push(ChatTurn { id: id.clone(), sender, text, provisional });
        id
    }
}
