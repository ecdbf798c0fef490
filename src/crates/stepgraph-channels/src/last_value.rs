//! LastValue channel - stores only the latest value

use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelCheckpoint, TypeSpec};
use crate::error::{ChannelError, Result};

/// Stores the last value received; each update overwrites the previous one.
///
/// Can receive exactly one value per step. A batch of zero or more than one
/// values has no defined winner and is rejected, leaving any prior value in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastValue<T> {
    value: Option<T>,
}

impl<T> LastValue<T> {
    /// Create a new LastValue channel
    pub fn new() -> Self {
        Self { value: None }
    }
}

impl<T> Default for LastValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Channel for LastValue<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Value = T;
    type Update = T;

    fn value_type(&self) -> TypeSpec {
        TypeSpec::of::<T>()
    }

    fn update_type(&self) -> Result<TypeSpec> {
        Ok(TypeSpec::of::<T>())
    }

    fn get(&self) -> Result<T> {
        self.value.clone().ok_or(ChannelError::EmptyChannel)
    }

    fn update(&mut self, updates: Vec<T>) -> Result<()> {
        if updates.len() != 1 {
            return Err(ChannelError::invalid_update(format!(
                "LastValue can receive exactly one value per step, got {}",
                updates.len()
            )));
        }
        self.value = updates.into_iter().next();
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.value.is_some()
    }

    fn enter(&self) -> Result<Self> {
        Ok(Self::new())
    }
}

impl<T> ChannelCheckpoint for LastValue<T>
where
    T: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    fn checkpoint(&self) -> Result<serde_json::Value> {
        match &self.value {
            Some(value) => Ok(serde_json::to_value(value)?),
            None => Err(ChannelError::EmptyChannel),
        }
    }

    fn restore(&mut self, snapshot: serde_json::Value) -> Result<()> {
        self.value = Some(serde_json::from_value(snapshot)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_get_fails() {
        let channel = LastValue::<i32>::new();
        assert!(!channel.is_available());
        assert!(channel.get().unwrap_err().is_empty_channel());
    }

    #[test]
    fn test_overwrite_on_update() {
        let mut channel = LastValue::new();
        channel.update(vec![3]).unwrap();
        assert_eq!(channel.get().unwrap(), 3);
        channel.update(vec![4]).unwrap();
        assert_eq!(channel.get().unwrap(), 4);
    }

    #[test]
    fn test_rejects_oversized_batch_and_keeps_prior() {
        let mut channel = LastValue::new();
        channel.update(vec![3]).unwrap();
        let err = channel.update(vec![5, 6]).unwrap_err();
        assert!(err.is_invalid_update());
        assert_eq!(channel.get().unwrap(), 3);
    }

    #[test]
    fn test_rejects_empty_batch() {
        let mut channel = LastValue::<i32>::new();
        assert!(channel.update(vec![]).unwrap_err().is_invalid_update());
        assert!(!channel.is_available());
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut channel = LastValue::new();
        channel.update(vec![42]).unwrap();
        let snapshot = channel.checkpoint().unwrap();

        let mut restored = LastValue::<i32>::new();
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.get().unwrap(), 42);
    }

    #[test]
    fn test_checkpoint_empty_fails() {
        let channel = LastValue::<i32>::new();
        assert!(channel.checkpoint().unwrap_err().is_empty_channel());
    }
}
