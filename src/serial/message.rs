//! Serial message records and the append-only session log.

use chrono::{DateTime, Local};

/// Which way a message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written by the dashboard to the device.
    Sent,
    /// Read from the device.
    Received,
}

impl Direction {
    /// Short label used in the console view.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent => "TX",
            Self::Received => "RX",
        }
    }
}

/// One exchanged line. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    timestamp: DateTime<Local>,
    direction: Direction,
    text: String,
}

impl Message {
    /// Creates a message stamped with the current local time.
    pub fn new(direction: Direction, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            direction,
            text: text.into(),
        }
    }

    /// Wall-clock time the message was recorded.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Direction of travel.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Payload without the line terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `HH:MM:SS` rendering of the timestamp.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Ordered log of every message exchanged during the dashboard's lifetime.
///
/// Appending is crate-private: only [`super::SerialSession`] writes here.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, message: Message) -> &Message {
        self.entries.push(message);
        &self.entries[self.entries.len() - 1]
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no messages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages in append order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    /// Most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Count of messages travelling in `direction`.
    pub fn count(&self, direction: Direction) -> usize {
        self.entries
            .iter()
            .filter(|m| m.direction == direction)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = MessageLog::new();
        log.append(Message::new(Direction::Sent, "ping"));
        log.append(Message::new(Direction::Received, "pong"));
        let texts: Vec<&str> = log.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["ping", "pong"]);
        assert_eq!(log.last().map(|m| m.direction()), Some(Direction::Received));
    }

    #[test]
    fn test_count_by_direction() {
        let mut log = MessageLog::new();
        log.append(Message::new(Direction::Sent, "a"));
        log.append(Message::new(Direction::Sent, "b"));
        log.append(Message::new(Direction::Received, "c"));
        assert_eq!(log.count(Direction::Sent), 2);
        assert_eq!(log.count(Direction::Received), 1);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_time_label_format() {
        let msg = Message::new(Direction::Received, "x");
        let label = msg.time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.chars().filter(|c| *c == ':').count(), 2);
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::Sent.label(), "TX");
        assert_eq!(Direction::Received.label(), "RX");
    }
}
