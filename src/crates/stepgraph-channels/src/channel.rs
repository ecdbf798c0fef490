//! Channel abstractions for step-driven state management
//!
//! Channels are typed state containers that manage how state is stored and
//! merged between steps of a graph computation. An engine acquires a channel
//! through its scoped constructor, applies zero or more update batches per
//! step, and reads the merged state back with [`Channel::get`]. Different
//! channel types provide different merge semantics; all of them implement the
//! single contract defined here.

use std::any::{type_name, TypeId};
use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, trace};

use crate::error::Result;

/// Static type descriptor for a channel's value or update slot.
///
/// Engines use these descriptors to validate the wiring between a producing
/// step's output and a channel's expected update type before execution starts,
/// without reading or mutating any channel state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    id: TypeId,
    name: &'static str,
}

impl TypeSpec {
    /// Descriptor for the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human-readable type name, for diagnostics only. The exact string is
    /// not stable across compiler versions; compare descriptors with `==` or
    /// [`matches`](TypeSpec::matches) instead.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this descriptor denotes the type `T`.
    pub fn matches<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeSpec({})", self.name)
    }
}

/// Base trait for all channels.
///
/// A configured channel value acts as a prototype: [`empty`](Channel::empty)
/// and [`aempty`](Channel::aempty) derive a fresh absent-state instance from
/// it, run the caller's body against that instance, and release it on both the
/// success and error return paths. For the value channels release is a no-op;
/// for [`Context`](crate::context::Context) it runs the resource teardown
/// exactly once.
///
/// `get` and `update` are always synchronous and non-blocking; the only
/// suspension points in the contract are `aenter`/`aexit`, reached through
/// `aempty`. Channels carry no locking: each instance is mutated by a single
/// logical owner, and within one scope updates are applied in the order
/// issued, each completing before the next is accepted.
#[async_trait]
pub trait Channel: fmt::Debug + Send + Sync + Sized {
    /// Type returned by [`get`](Channel::get).
    type Value: Send;

    /// Element type of an update batch.
    type Update: Send;

    /// Descriptor of the value type.
    fn value_type(&self) -> TypeSpec;

    /// Descriptor of the update type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpdate` for channels that accept no updates at all
    /// (Context): such a channel has no update type to describe.
    fn update_type(&self) -> Result<TypeSpec>;

    /// Get the current value of the channel.
    ///
    /// # Errors
    ///
    /// Returns `EmptyChannel` if the channel holds no defined value. Channels
    /// whose absent state has a defined default (UniqueArchive) never fail
    /// here. Reading never mutates state: two consecutive calls without an
    /// intervening update return equal values.
    fn get(&self) -> Result<Self::Value>;

    /// Apply one step's batch of updates to the channel.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpdate` if the batch violates the channel's shape
    /// contract, in which case the stored value is left untouched: there is
    /// no partial merge.
    fn update(&mut self, updates: Vec<Self::Update>) -> Result<()>;

    /// Check if the channel has a readable value.
    fn is_available(&self) -> bool {
        self.get().is_ok()
    }

    /// Construct a fresh absent-state instance from this prototype.
    ///
    /// Prefer [`empty`](Channel::empty), which pairs this with
    /// [`exit`](Channel::exit) on all return paths.
    fn enter(&self) -> Result<Self>;

    /// Release an instance produced by [`enter`](Channel::enter).
    fn exit(&self, chan: Self) -> Result<()> {
        drop(chan);
        Ok(())
    }

    /// Asynchronous construction; defaults to the synchronous path.
    async fn aenter(&self) -> Result<Self> {
        self.enter()
    }

    /// Asynchronous release; defaults to the synchronous path.
    async fn aexit(&self, chan: Self) -> Result<()> {
        self.exit(chan)
    }

    /// Run `body` against a fresh scoped instance.
    ///
    /// The instance is released when `body` returns, whether it succeeded or
    /// failed. If `body` fails, its error propagates and release is still
    /// attempted first; a release failure on that path is dropped after being
    /// recorded at debug level. If `body` succeeds and release fails, the
    /// release error propagates.
    fn empty<R, B>(&self, body: B) -> Result<R>
    where
        B: FnOnce(&mut Self) -> Result<R>,
    {
        let mut chan = self.enter()?;
        trace!(channel = type_name::<Self>(), "entered channel scope");
        let result = body(&mut chan);
        let released = self.exit(chan);
        trace!(channel = type_name::<Self>(), "released channel scope");
        match result {
            Ok(value) => released.map(|()| value),
            Err(err) => {
                if let Err(release_err) = released {
                    debug!(error = %release_err, "teardown failed while unwinding channel scope");
                }
                Err(err)
            }
        }
    }

    /// Asynchronous form of [`empty`](Channel::empty).
    ///
    /// Behaviorally identical apart from where construction and release may
    /// suspend. The body is the usual boxed-closure future:
    ///
    /// ```rust,ignore
    /// channel.aempty(|chan| Box::pin(async move {
    ///     chan.update(vec![3])?;
    ///     chan.get()
    /// })).await?;
    /// ```
    async fn aempty<R, B>(&self, body: B) -> Result<R>
    where
        R: Send,
        B: for<'a> FnOnce(&'a mut Self) -> BoxFuture<'a, Result<R>> + Send,
    {
        let mut chan = self.aenter().await?;
        trace!(channel = type_name::<Self>(), "entered channel scope");
        let result = body(&mut chan).await;
        let released = self.aexit(chan).await;
        trace!(channel = type_name::<Self>(), "released channel scope");
        match result {
            Ok(value) => released.map(|()| value),
            Err(err) => {
                if let Err(release_err) = released {
                    debug!(error = %release_err, "teardown failed while unwinding channel scope");
                }
                Err(err)
            }
        }
    }
}

/// Snapshot surface for channels whose stored state can be persisted.
///
/// Implemented by the value channels; Context has no snapshot because its
/// value is owned by the resource factory, not the channel. Storage of the
/// produced snapshots belongs to the surrounding engine.
pub trait ChannelCheckpoint: Channel {
    /// Serializable snapshot of the stored state.
    ///
    /// # Errors
    ///
    /// Returns `EmptyChannel` for channels whose state is still absent.
    fn checkpoint(&self) -> Result<serde_json::Value>;

    /// Reload state from a snapshot produced by
    /// [`checkpoint`](ChannelCheckpoint::checkpoint).
    fn restore(&mut self, snapshot: serde_json::Value) -> Result<()>;
}
