use std::time::{Duration, Instant};
use versecore::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    fn lifetime(self) -> Duration {
        match self {
            MessageType::Info => Duration::from_secs(3),
            MessageType::Success => Duration::from_secs(2),
            MessageType::Warning => Duration::from_secs(5),
            MessageType::Error => Duration::from_secs(7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            content: content.into(),
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Some(message_type.lifetime()),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.auto_clear_duration
            .is_some_and(|duration| self.created_at.elapsed() > duration)
    }
}

/// Transient feedback on the left of the status bar, reading state on the right.
#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, message: impl Into<String>, message_type: MessageType) {
        let message = message.into();
        match message_type {
            MessageType::Error => log::error!("{}", message),
            MessageType::Warning => log::warn!("{}", message),
            _ => log::debug!("status: {}", message),
        }
        self.current_message = Some(StatusMessage::new(message, message_type));
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set(message, MessageType::Info);
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set(message, MessageType::Success);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set(message, MessageType::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(message, MessageType::Error);
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Drops the current message once it has outlived its type's lifetime.
    pub fn update(&mut self) {
        if self.current_message.as_ref().is_some_and(|m| m.is_expired()) {
            self.current_message = None;
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }

    /// Right-hand summary: active template, toggles and reading position.
    pub fn reading_summary(
        config: &RenderConfig,
        template: Option<&str>,
        verse_count: usize,
        modified: bool,
    ) -> String {
        let mut parts = Vec::new();
        if modified {
            parts.push("[+]".to_string());
        }
        if let Some(name) = template {
            parts.push(format!("template:{}", name));
        }
        if config.compact_mode {
            parts.push("compact".to_string());
        }
        if config.show_verse_numbers {
            parts.push("numbers".to_string());
        }
        match config.current_verse_index {
            Some(verse) if config.highlight_current_verse => {
                parts.push(format!("verse {}/{}", verse + 1, verse_count));
            }
            _ => parts.push(format!("{} verses", verse_count)),
        }
        parts.join("  ")
    }
}
