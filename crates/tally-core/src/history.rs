//! In-memory history stack
//!
//! Entries are in-app paths (base stripped) with query and hash.

/// Back/forward stack of visited locations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    position: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry after the current one, dropping any forward entries
    pub fn push(&mut self, path: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push(path.into());
        self.position = self.entries.len() - 1;
    }

    /// Overwrite the current entry
    pub fn replace(&mut self, path: impl Into<String>) {
        match self.entries.get_mut(self.position) {
            Some(entry) => *entry = path.into(),
            None => self.push(path),
        }
    }

    /// Move `delta` entries; `None` (and no move) when out of range
    pub fn go(&mut self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        let entry = self.entries.get(target)?;
        self.position = target;
        Some(entry)
    }

    /// Entry `delta` away from the current one, without moving
    pub fn peek(&self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        self.entries.get(target).map(|s| s.as_str())
    }

    pub fn back(&mut self) -> Option<&str> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<&str> {
        self.go(1)
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.position).map(|s| s.as_str())
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Index of the current entry
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_navigate() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.current(), None);
        assert_eq!(history.back(), None);

        history.push("/list");
        history.push("/vote/1");
        history.push("/vote/2");
        assert_eq!(history.current(), Some("/vote/2"));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());

        assert_eq!(history.back(), Some("/vote/1"));
        assert_eq!(history.back(), Some("/list"));
        assert_eq!(history.back(), None);
        assert_eq!(history.current(), Some("/list"));

        assert_eq!(history.go(2), Some("/vote/2"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_peek_does_not_move() {
        let mut history = History::new();
        history.push("/list");
        history.push("/vote/1");

        assert_eq!(history.peek(-1), Some("/list"));
        assert_eq!(history.peek(1), None);
        assert_eq!(history.peek(-5), None);
        assert_eq!(history.position(), 1);
        assert_eq!(history.current(), Some("/vote/1"));
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = History::new();
        history.push("/list");
        history.push("/vote/1");
        history.back();

        history.push("/vote/9");
        assert_eq!(history.entries(), &["/list".to_string(), "/vote/9".to_string()]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_replace() {
        let mut history = History::new();
        history.replace("/list");
        assert_eq!(history.len(), 1);

        history.push("/vote/1");
        history.replace("/vote/2");
        assert_eq!(history.entries(), &["/list".to_string(), "/vote/2".to_string()]);
        assert_eq!(history.current(), Some("/vote/2"));
    }
}
