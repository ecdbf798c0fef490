//! UniqueArchive channel - deduplicating set accumulator

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelCheckpoint, TypeSpec};
use crate::error::Result;

/// Accumulates items into a set; duplicates are silently absorbed.
///
/// Unlike the other value channels, absence is defined as the empty set:
/// `get` on a fresh channel returns an empty set rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueArchive<T: Eq + Hash> {
    values: HashSet<T>,
}

impl<T: Eq + Hash> UniqueArchive<T> {
    /// Create a new UniqueArchive channel
    pub fn new() -> Self {
        Self {
            values: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> Default for UniqueArchive<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Channel for UniqueArchive<T>
where
    T: Clone + Debug + Eq + Hash + Send + Sync + 'static,
{
    type Value = HashSet<T>;
    type Update = T;

    fn value_type(&self) -> TypeSpec {
        TypeSpec::of::<HashSet<T>>()
    }

    fn update_type(&self) -> Result<TypeSpec> {
        Ok(TypeSpec::of::<T>())
    }

    /// Returns a snapshot of the set; never fails.
    fn get(&self) -> Result<HashSet<T>> {
        Ok(self.values.clone())
    }

    fn update(&mut self, updates: Vec<T>) -> Result<()> {
        for item in updates {
            self.values.insert(item);
        }
        Ok(())
    }

    fn enter(&self) -> Result<Self> {
        Ok(Self::new())
    }
}

impl<T> ChannelCheckpoint for UniqueArchive<T>
where
    T: Clone + Debug + Eq + Hash + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    fn checkpoint(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.values)?)
    }

    fn restore(&mut self, snapshot: serde_json::Value) -> Result<()> {
        self.values = serde_json::from_value(snapshot)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_channel_returns_empty_set() {
        let channel = UniqueArchive::<String>::new();
        assert!(channel.get().unwrap().is_empty());
        assert!(channel.is_available());
    }

    #[test]
    fn test_deduplicates_across_updates() {
        let mut channel = UniqueArchive::new();
        channel.update(vec!["a", "b"]).unwrap();
        assert_eq!(channel.get().unwrap(), HashSet::from(["a", "b"]));

        channel.update(vec!["b", "c"]).unwrap();
        assert_eq!(channel.get().unwrap(), HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_duplicates_within_batch_absorbed() {
        let mut channel = UniqueArchive::new();
        channel.update(vec![1, 1, 2, 2, 2]).unwrap();
        assert_eq!(channel.get().unwrap(), HashSet::from([1, 2]));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut channel = UniqueArchive::<i32>::new();
        channel.update(vec![]).unwrap();
        assert!(channel.get().unwrap().is_empty());
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut channel = UniqueArchive::new();
        channel.update(vec!["x".to_string(), "y".to_string()]).unwrap();
        let snapshot = channel.checkpoint().unwrap();

        let mut restored = UniqueArchive::<String>::new();
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.get().unwrap(), channel.get().unwrap());
    }
}
