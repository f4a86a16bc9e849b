//! Render sinks: where a session's output goes
//!
//! A sink receives complete snapshots (full markup, full step list) and
//! replaces what it shows; it is never asked to patch earlier output.

use crate::protocol::ThoughtStep;
use crate::render::escape_html;

/// Presentation layer driven by a [`ChatSession`](super::ChatSession)
pub trait RenderSink: Send {
    /// Echo the user's message
    fn user_message(&mut self, text: &str);

    /// Create the empty agent message that in-progress output renders into
    fn agent_started(&mut self);

    /// Replace the agent message body with `markup`
    fn agent_markup(&mut self, markup: &str);

    /// Replace the step list; `steps` is ordered most recent first
    fn thought_steps(&mut self, steps: &[ThoughtStep]);

    /// Show a terminal error for the current agent message
    fn agent_failed(&mut self, message: &str);

    /// The agent message is complete
    fn agent_finished(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

/// One message as shown in a [`ChatView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewMessage {
    pub role: Role,
    /// Sanitized markup
    pub markup: String,
    /// Terminal error shown with the message
    pub error: Option<String>,
    pub finished: bool,
}

impl ViewMessage {
    /// Markup including the error notice, if any
    pub fn display_markup(&self) -> String {
        match &self.error {
            Some(error) => format!(
                r#"{}<div class="error">{}</div>"#,
                self.markup,
                escape_html(error)
            ),
            None => self.markup.clone(),
        }
    }
}

/// Headless read-only projection of a conversation
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    messages: Vec<ViewMessage>,
    steps: Vec<ThoughtStep>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ViewMessage] {
        &self.messages
    }

    /// Step list of the current turn, most recent first
    pub fn steps(&self) -> &[ThoughtStep] {
        &self.steps
    }

    /// The most recent agent message
    pub fn last_agent(&self) -> Option<&ViewMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Agent)
    }

    fn current_agent(&mut self) -> Option<&mut ViewMessage> {
        self.messages
            .iter_mut()
            .rev()
            .find(|m| m.role == Role::Agent && !m.finished)
    }
}

impl RenderSink for ChatView {
    fn user_message(&mut self, text: &str) {
        self.messages.push(ViewMessage {
            role: Role::User,
            markup: escape_html(text),
            error: None,
            finished: true,
        });
    }

    fn agent_started(&mut self) {
        self.steps.clear();
        self.messages.push(ViewMessage {
            role: Role::Agent,
            markup: String::new(),
            error: None,
            finished: false,
        });
    }

    fn agent_markup(&mut self, markup: &str) {
        if let Some(message) = self.current_agent() {
            message.markup = markup.to_string();
        }
    }

    fn thought_steps(&mut self, steps: &[ThoughtStep]) {
        self.steps = steps.to_vec();
    }

    fn agent_failed(&mut self, error: &str) {
        if let Some(message) = self.current_agent() {
            message.error = Some(error.to_string());
            message.finished = true;
        }
    }

    fn agent_finished(&mut self) {
        if let Some(message) = self.current_agent() {
            message.finished = true;
        }
    }
}
