//! BinaryOperatorAggregate channel - associative fold accumulator

use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::channel::{Channel, ChannelCheckpoint, TypeSpec};
use crate::error::{ChannelError, Result};

/// Folds updates into a single value with an injected binary operator.
///
/// The operator is supplied at construction and trusted to be associative;
/// no commutativity is assumed. The fold order is fixed for the channel's
/// lifetime: the prior value (when present) sits on the left, then each batch
/// element is folded in left-to-right. By associativity this equals combining
/// the prior value with the batch's own left-to-right fold.
pub struct BinaryOperatorAggregate<T, F> {
    value: Option<T>,
    operator: Arc<F>,
}

impl<T, F> BinaryOperatorAggregate<T, F>
where
    F: Fn(T, T) -> T,
{
    /// Create a new channel folding with `operator`.
    pub fn new(operator: F) -> Self {
        Self {
            value: None,
            operator: Arc::new(operator),
        }
    }
}

impl<T: Debug, F> Debug for BinaryOperatorAggregate<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperatorAggregate")
            .field("value", &self.value)
            .field("operator", &"<function>")
            .finish()
    }
}

impl<T, F> Clone for BinaryOperatorAggregate<T, F>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            operator: Arc::clone(&self.operator),
        }
    }
}

#[async_trait]
impl<T, F> Channel for BinaryOperatorAggregate<T, F>
where
    T: Clone + Debug + Send + Sync + 'static,
    F: Fn(T, T) -> T + Send + Sync + 'static,
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
        // An empty batch is a no-op and does not populate the channel.
        let mut items = updates.into_iter();
        let Some(first) = items.next() else {
            return Ok(());
        };
        let mut acc = match self.value.take() {
            Some(current) => (self.operator)(current, first),
            None => first,
        };
        for item in items {
            acc = (self.operator)(acc, item);
        }
        self.value = Some(acc);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.value.is_some()
    }

    fn enter(&self) -> Result<Self> {
        Ok(Self {
            value: None,
            operator: Arc::clone(&self.operator),
        })
    }
}

impl<T, F> ChannelCheckpoint for BinaryOperatorAggregate<T, F>
where
    T: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static,
    F: Fn(T, T) -> T + Send + Sync + 'static,
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
