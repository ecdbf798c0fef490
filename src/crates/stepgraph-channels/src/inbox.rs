//! Inbox channel - ordered accumulator with flattening updates

use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelCheckpoint, TypeSpec};
use crate::error::{ChannelError, Result};

/// One element of an Inbox update batch: a single item or a run of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxUpdate<T> {
    Item(T),
    Items(Vec<T>),
}

impl<T> From<T> for InboxUpdate<T> {
    fn from(item: T) -> Self {
        Self::Item(item)
    }
}

impl<T> From<Vec<T>> for InboxUpdate<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Items(items)
    }
}

/// Accumulates items across steps in a flat ordered sequence.
///
/// Each update batch is flattened (batch order first, then sub-sequence
/// order) and appended to the stored sequence. The channel counts as absent
/// until the first non-empty update; accumulation across `update` calls is
/// pure append, never replace-per-call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inbox<T> {
    queue: Option<Vec<T>>,
}

impl<T> Inbox<T> {
    /// Create a new Inbox channel
    pub fn new() -> Self {
        Self { queue: None }
    }
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Channel for Inbox<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Value = Vec<T>;
    type Update = InboxUpdate<T>;

    fn value_type(&self) -> TypeSpec {
        TypeSpec::of::<Vec<T>>()
    }

    fn update_type(&self) -> Result<TypeSpec> {
        Ok(TypeSpec::of::<InboxUpdate<T>>())
    }

    fn get(&self) -> Result<Vec<T>> {
        self.queue.clone().ok_or(ChannelError::EmptyChannel)
    }

    fn update(&mut self, updates: Vec<InboxUpdate<T>>) -> Result<()> {
        // An empty batch is a no-op and does not populate the channel.
        if updates.is_empty() {
            return Ok(());
        }
        let queue = self.queue.get_or_insert_with(Vec::new);
        for update in updates {
            match update {
                InboxUpdate::Item(item) => queue.push(item),
                InboxUpdate::Items(items) => queue.extend(items),
            }
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.queue.is_some()
    }

    fn enter(&self) -> Result<Self> {
        Ok(Self::new())
    }
}

impl<T> ChannelCheckpoint for Inbox<T>
where
    T: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    fn checkpoint(&self) -> Result<serde_json::Value> {
        match &self.queue {
            Some(queue) => Ok(serde_json::to_value(queue)?),
            None => Err(ChannelError::EmptyChannel),
        }
    }

    fn restore(&mut self, snapshot: serde_json::Value) -> Result<()> {
        self.queue = Some(serde_json::from_value(snapshot)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_get_fails() {
        let channel = Inbox::<String>::new();
        assert!(channel.get().unwrap_err().is_empty_channel());
    }

    #[test]
    fn test_accumulates_in_call_order() {
        let mut channel = Inbox::new();
        channel
            .update(vec![InboxUpdate::Item("a"), InboxUpdate::Item("b")])
            .unwrap();
        assert_eq!(channel.get().unwrap(), vec!["a", "b"]);

        channel
            .update(vec![InboxUpdate::Items(vec!["c"]), InboxUpdate::Item("d")])
            .unwrap();
        assert_eq!(channel.get().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_flattens_batch_order_then_subsequence_order() {
        let mut channel = Inbox::new();
        channel
            .update(vec![
                InboxUpdate::Items(vec![1, 2]),
                InboxUpdate::Item(3),
                InboxUpdate::Items(vec![4, 5]),
            ])
            .unwrap();
        assert_eq!(channel.get().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_batch_is_noop_and_stays_absent() {
        let mut channel = Inbox::<i32>::new();
        channel.update(vec![]).unwrap();
        assert!(!channel.is_available());
    }

    #[test]
    fn test_empty_run_populates_with_empty_sequence() {
        let mut channel = Inbox::<i32>::new();
        channel.update(vec![InboxUpdate::Items(vec![])]).unwrap();
        assert_eq!(channel.get().unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut channel = Inbox::new();
        channel
            .update(vec![InboxUpdate::Items(vec![1, 2, 3])])
            .unwrap();
        let snapshot = channel.checkpoint().unwrap();

        let mut restored = Inbox::<i32>::new();
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.get().unwrap(), vec![1, 2, 3]);
    }
}
