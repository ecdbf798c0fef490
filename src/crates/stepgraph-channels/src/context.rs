//! Context channel - wraps an externally managed resource
//!
//! A Context channel holds a value produced by a resource factory (a network
//! client, a connection pool, a file handle) rather than by updates. The
//! factory is entered when the channel scope opens and released exactly once
//! when it closes, on both the success and error paths. From the channel's
//! perspective the value is read-only: every `update` is rejected.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::channel::{Channel, TypeSpec};
use crate::error::{ChannelError, Result};

/// Scoped acquisition of an external resource with guaranteed release.
///
/// `setup` runs exactly once per channel scope, `teardown` exactly once at
/// scope exit. Errors from either propagate to the caller unmodified, carried
/// as [`ChannelError::Resource`].
pub trait ResourceFactory: Send + Sync {
    /// The resource produced by [`setup`](ResourceFactory::setup). Wrap
    /// resources that are not `Clone` in an [`Arc`].
    type Resource: Clone + Send + Sync + 'static;

    /// Acquire the resource.
    fn setup(&self) -> Result<Self::Resource>;

    /// Release the resource. Defaults to dropping it.
    fn teardown(&self, resource: Self::Resource) -> Result<()> {
        drop(resource);
        Ok(())
    }
}

/// Asynchronous counterpart of [`ResourceFactory`].
#[async_trait]
pub trait AsyncResourceFactory: Send + Sync {
    /// The resource produced by [`setup`](AsyncResourceFactory::setup).
    type Resource: Clone + Send + Sync + 'static;

    /// Acquire the resource.
    async fn setup(&self) -> Result<Self::Resource>;

    /// Release the resource. Defaults to dropping it.
    async fn teardown(&self, resource: Self::Resource) -> Result<()> {
        drop(resource);
        Ok(())
    }
}

/// Placeholder async factory for a [`Context`] built from a synchronous
/// factory alone. Never invoked: `aempty` adapts the synchronous factory
/// when no asynchronous one is configured.
pub struct NoAsyncFactory<R>(PhantomData<fn() -> R>);

impl<R> fmt::Debug for NoAsyncFactory<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoAsyncFactory")
    }
}

#[async_trait]
impl<R> AsyncResourceFactory for NoAsyncFactory<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Resource = R;

    async fn setup(&self) -> Result<R> {
        Err(ChannelError::Resource(
            "no asynchronous resource factory configured".into(),
        ))
    }
}

/// Read-only channel bound to an externally managed resource.
///
/// Constructed from a required synchronous [`ResourceFactory`] and an
/// optional [`AsyncResourceFactory`]. `empty` enters the synchronous factory;
/// `aempty` enters the asynchronous one when supplied and adapts the
/// synchronous one otherwise, with the same exactly-once setup/teardown
/// guarantee either way.
pub struct Context<F: ResourceFactory, A = NoAsyncFactory<<F as ResourceFactory>::Resource>>
where
    A: AsyncResourceFactory<Resource = F::Resource>,
{
    factory: Arc<F>,
    afactory: Option<Arc<A>>,
    value: Option<F::Resource>,
}

impl<F> Context<F>
where
    F: ResourceFactory,
{
    /// Create a Context channel with a synchronous factory only.
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            afactory: None,
            value: None,
        }
    }
}

impl<F, A> Context<F, A>
where
    F: ResourceFactory,
    A: AsyncResourceFactory<Resource = F::Resource>,
{
    /// Create a Context channel with both a synchronous and an asynchronous
    /// factory. `aempty` prefers the asynchronous one.
    pub fn with_async(factory: F, afactory: A) -> Self {
        Self {
            factory: Arc::new(factory),
            afactory: Some(Arc::new(afactory)),
            value: None,
        }
    }
}

impl<F, A> fmt::Debug for Context<F, A>
where
    F: ResourceFactory,
    A: AsyncResourceFactory<Resource = F::Resource>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("value", &self.value.as_ref().map(|_| "<resource>"))
            .field("has_async_factory", &self.afactory.is_some())
            .finish()
    }
}

#[async_trait]
impl<F, A> Channel for Context<F, A>
where
    F: ResourceFactory + 'static,
    A: AsyncResourceFactory<Resource = F::Resource> + 'static,
{
    type Value = F::Resource;
    type Update = ();

    fn value_type(&self) -> TypeSpec {
        TypeSpec::of::<F::Resource>()
    }

    /// A Context channel has no update type to describe.
    fn update_type(&self) -> Result<TypeSpec> {
        Err(ChannelError::invalid_update(
            "Context channels do not accept updates",
        ))
    }

    /// Returns the held resource; never absent once the scope is entered.
    fn get(&self) -> Result<F::Resource> {
        self.value.clone().ok_or(ChannelError::EmptyChannel)
    }

    fn update(&mut self, _updates: Vec<()>) -> Result<()> {
        Err(ChannelError::invalid_update(
            "Context value is managed by its resource factory",
        ))
    }

    fn is_available(&self) -> bool {
        self.value.is_some()
    }

    fn enter(&self) -> Result<Self> {
        let value = self.factory.setup()?;
        debug!("context resource acquired");
        Ok(Self {
            factory: Arc::clone(&self.factory),
            afactory: self.afactory.clone(),
            value: Some(value),
        })
    }

    fn exit(&self, mut chan: Self) -> Result<()> {
        match chan.value.take() {
            Some(value) => {
                let released = self.factory.teardown(value);
                debug!("context resource released");
                released
            }
            None => Ok(()),
        }
    }

    async fn aenter(&self) -> Result<Self> {
        let value = match &self.afactory {
            Some(afactory) => afactory.setup().await?,
            None => self.factory.setup()?,
        };
        debug!("context resource acquired");
        Ok(Self {
            factory: Arc::clone(&self.factory),
            afactory: self.afactory.clone(),
            value: Some(value),
        })
    }

    async fn aexit(&self, mut chan: Self) -> Result<()> {
        let released = match (&self.afactory, chan.value.take()) {
            (Some(afactory), Some(value)) => afactory.teardown(value).await,
            (None, Some(value)) => self.factory.teardown(value),
            (_, None) => return Ok(()),
        };
        debug!("context resource released");
        released
    }
}
