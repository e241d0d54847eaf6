use std::collections::HashSet;
use std::sync::Mutex;

/// Ids of comments the bot already picked up.
///
/// Checking and recording happen under one lock, so a comment is dispatched at
/// most once even when two workers see it at the same time.
#[derive(Debug, Default)]
pub struct SeenComments {
    ids: Mutex<HashSet<String>>,
}

impl SeenComments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`. Returns `true` if it had not been seen before.
    pub fn mark(&self, id: &str) -> bool {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        let ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
