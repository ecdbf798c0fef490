//! # stepgraph-channels - Typed State Channels for Step-Driven Execution
//!
//! **Typed, mutable state cells** that serve as the communication primitive
//! between steps of a dataflow computation. Each step reads channel values,
//! produces updates, and the surrounding engine applies those updates to the
//! channels before the next step begins.
//!
//! ## Channel Types
//!
//! All variants implement the single [`Channel`] contract and differ only in
//! their merge policy:
//!
//! - [`LastValue`] - Single value, overwrite on update (exactly one value per step)
//! - [`Inbox`] - Ordered accumulator; batches are flattened and appended
//! - [`UniqueArchive`] - Deduplicating set accumulator
//! - [`BinaryOperatorAggregate`] - Associative fold with an injected operator
//! - [`Context`] - Read-only wrapper around an externally managed resource
//!
//! ## State and Error Semantics
//!
//! | Variant | Absent read | Invalid update | Duplicates |
//! |---|---|---|---|
//! | `LastValue` | `EmptyChannel` | batch size != 1 | n/a (overwrite) |
//! | `Inbox` | `EmptyChannel` | never (any shape flattened) | preserved |
//! | `UniqueArchive` | empty set | never | deduped |
//! | `BinaryOperatorAggregate` | `EmptyChannel` | never (empty batch is a no-op) | n/a (folded) |
//! | `Context` | never absent in scope | every update | n/a |
//!
//! [`ChannelError::EmptyChannel`] and [`ChannelError::InvalidUpdate`] are the
//! only error kinds an engine must handle; resource-factory failures pass
//! through as [`ChannelError::Resource`] with the original error attached.
//! A failed update never leaves a partial merge behind.
//!
//! ## Scoped Construction
//!
//! A configured channel acts as a prototype. [`Channel::empty`] runs a body
//! against a fresh instance and releases it on every return path;
//! [`Channel::aempty`] is the asynchronous form, used when a
//! [`Context`] resource must be set up or torn down at an await point. For
//! resource-backed channels setup and teardown each run exactly once per
//! scope.
//!
//! ```rust
//! use stepgraph_channels::{Channel, Inbox, InboxUpdate, LastValue, Result};
//!
//! fn main() -> Result<()> {
//!     let cell = LastValue::<i64>::new();
//!     cell.empty(|chan| {
//!         chan.update(vec![3])?;
//!         assert_eq!(chan.get()?, 3);
//!         chan.update(vec![4])?;
//!         assert_eq!(chan.get()?, 4); // overwrite, not accumulate
//!         Ok(())
//!     })?;
//!
//!     let inbox = Inbox::<String>::new();
//!     inbox.empty(|chan| {
//!         chan.update(vec![
//!             InboxUpdate::Item("a".to_string()),
//!             InboxUpdate::Items(vec!["b".to_string(), "c".to_string()]),
//!         ])?;
//!         assert_eq!(chan.get()?, vec!["a", "b", "c"]);
//!         Ok(())
//!     })?;
//!     Ok(())
//! }
//! ```
//!
//! ## Wiring Introspection
//!
//! Every channel exposes [`TypeSpec`] descriptors for its value and update
//! slots, readable without touching channel state. An engine can check that a
//! producing step's output type matches a channel's expected update type
//! before execution starts:
//!
//! ```rust
//! use stepgraph_channels::{Channel, LastValue, TypeSpec};
//!
//! let cell = LastValue::<i64>::new();
//! assert!(cell.update_type().unwrap().matches::<i64>());
//! assert_eq!(cell.value_type(), TypeSpec::of::<i64>());
//! ```
//!
//! ## Concurrency Model
//!
//! Channels are passive data structures mutated by exactly one caller at a
//! time, matching a cooperative superstep execution model. `get` and `update`
//! never suspend or block; the only suspension points are the scoped
//! construction and release of [`Context`] channels. Callers needing
//! concurrent access must serialize it externally.
//!
//! ## Module Organization
//!
//! - [`channel`] - [`Channel`] contract, [`TypeSpec`], [`ChannelCheckpoint`]
//! - [`error`] - [`ChannelError`] taxonomy
//! - [`last_value`], [`inbox`], [`archive`], [`binop`] - value channels
//! - [`context`] - resource-backed channel and its factory traits

pub mod archive;
pub mod binop;
pub mod channel;
pub mod context;
pub mod error;
pub mod inbox;
pub mod last_value;

// Re-export main types
pub use archive::UniqueArchive;
pub use binop::BinaryOperatorAggregate;
pub use channel::{Channel, ChannelCheckpoint, TypeSpec};
pub use context::{AsyncResourceFactory, Context, NoAsyncFactory, ResourceFactory};
pub use error::{ChannelError, Result};
pub use inbox::{Inbox, InboxUpdate};
pub use last_value::LastValue;
