/// Operator-visible, append-only message list (the feedback area).
#[derive(Clone, Debug, Default)]
pub struct FeedbackLog {
    lines: Vec<String>,
    shown: usize,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(message);
    }

    pub fn error(&mut self, message: impl std::fmt::Display) {
        let line = format!("Error: {message}");
        tracing::warn!("{line}");
        self.lines.push(line);
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Lines appended since the previous call.
    pub fn take_unseen(&mut self) -> &[String] {
        let start = self.shown;
        self.shown = self.lines.len();
        &self.lines[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_lines_are_returned_once() {
        let mut log = FeedbackLog::new();
        log.info("one");
        log.error("two");
        assert_eq!(log.take_unseen(), ["one".to_string(), "Error: two".to_string()]);
        assert!(log.take_unseen().is_empty());
        log.info("three");
        assert_eq!(log.take_unseen(), ["three".to_string()]);
        assert_eq!(log.last(), Some("three"));
    }
}
