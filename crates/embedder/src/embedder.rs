//! The embed pass and its two drivers.

use std::sync::Arc;

use embedder_cache::NullCache;
use embedder_mdast::Node;
use futures::future::try_join_all;
use serde_json::Value;

use crate::cache::EmbedCache;
use crate::deferred::Deferred;
use crate::error::{EmbedError, ErrorHandler};
use crate::fetch::Orchestrator;
use crate::scan::scan;
use crate::transformer::{Registry, Transformer, TransformerEntry};

type AsyncPredicate = Box<dyn Fn() -> bool + Send + Sync>;

/// How resolved candidates are worked through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Schedule {
    /// One candidate at a time, in document order.
    Sequential,
    /// All candidates interleaved on the current task.
    Concurrent,
}

/// Replaces URL-only paragraphs with markup from registered transformers.
///
/// The embedder holds configuration only; every call to a `transform`
/// method is an independent pass over the given tree.
///
/// # Example
///
/// ```
/// use embedder::{Embedder, FnTransformer};
/// use embedder_mdast::{parse_markdown, to_html};
///
/// let embedder = Embedder::builder()
///     .transformer(FnTransformer::new(
///         "example",
///         |url| url.host_str() == Some("example.com"),
///         |_, _| Ok(Some("<div>x</div>".to_owned())),
///     ))
///     .build()
///     .unwrap();
///
/// let mut tree = parse_markdown("Look:\n\nhttps://example.com");
/// embedder.transform_sync(&mut tree).unwrap();
///
/// assert_eq!(to_html(&tree), "<p>Look:</p>\n<div>x</div>");
/// ```
pub struct Embedder {
    registry: Registry,
    cache: Arc<dyn EmbedCache>,
    handle_error: Option<Arc<dyn ErrorHandler>>,
    is_async: Option<AsyncPredicate>,
}

impl Embedder {
    /// Start configuring an embedder.
    pub fn builder() -> EmbedderBuilder {
        EmbedderBuilder::default()
    }

    /// Registered transformers in priority order.
    pub fn transformers(&self) -> &[TransformerEntry] {
        self.registry.entries()
    }

    /// Run one pass with the driver chosen by the `is_async` predicate.
    ///
    /// The predicate is evaluated once per call. Without a predicate, or when
    /// it returns `false`, the pass runs synchronously and the returned value
    /// is already resolved. Otherwise the returned future runs the
    /// concurrent driver when awaited.
    pub fn transform<'a>(&'a self, tree: &'a mut Node) -> Deferred<'a, Result<(), EmbedError>> {
        if self.is_async.as_ref().is_some_and(|is_async| is_async()) {
            Deferred::pending(self.transform_async(tree))
        } else {
            Deferred::ready(self.transform_sync(tree))
        }
    }

    /// Run one pass, processing candidates one at a time.
    ///
    /// Pending collaborator futures are driven to completion on the current
    /// thread. The first failure stops the pass; earlier candidates keep
    /// their annotations.
    pub fn transform_sync(&self, tree: &mut Node) -> Result<(), EmbedError> {
        futures::executor::block_on(self.run(tree, Schedule::Sequential))
    }

    /// Run one pass, rendering all candidates concurrently.
    ///
    /// Transformer selection still happens in document order before any
    /// rendering starts. The first failure fails the pass; candidates that
    /// finished before it keep their annotations.
    pub async fn transform_async(&self, tree: &mut Node) -> Result<(), EmbedError> {
        self.run(tree, Schedule::Concurrent).await
    }

    async fn run(&self, tree: &mut Node, schedule: Schedule) -> Result<(), EmbedError> {
        let candidates = scan(tree);
        if candidates.is_empty() {
            return Ok(());
        }

        let resolved = self.registry.select_all(candidates).await;
        tracing::debug!("Embedding {} candidate(s) ({schedule:?})", resolved.len());

        let orchestrator = Orchestrator {
            cache: self.cache.as_ref(),
            handle_error: self.handle_error.as_deref(),
        };
        let orchestrator = &orchestrator;

        match schedule {
            Schedule::Sequential => {
                for embed in resolved {
                    orchestrator.embed(embed).await?;
                }
            }
            Schedule::Concurrent => {
                try_join_all(resolved.into_iter().map(move |embed| orchestrator.embed(embed))).await?;
            }
        }

        Ok(())
    }
}

/// Builder for [`Embedder`].
///
/// Transformers are consulted in the order they are added.
#[derive(Default)]
pub struct EmbedderBuilder {
    entries: Vec<TransformerEntry>,
    cache: Option<Arc<dyn EmbedCache>>,
    handle_error: Option<Arc<dyn ErrorHandler>>,
    is_async: Option<AsyncPredicate>,
}

impl EmbedderBuilder {
    /// Register a transformer without configuration.
    #[must_use]
    pub fn transformer<T: Transformer + 'static>(mut self, transformer: T) -> Self {
        self.entries.push(TransformerEntry::new(transformer));
        self
    }

    /// Register a transformer whose `get_html` receives `config`.
    #[must_use]
    pub fn transformer_with_config<T: Transformer + 'static>(
        mut self,
        transformer: T,
        config: Value,
    ) -> Self {
        self.entries
            .push(TransformerEntry::new(transformer).with_config(config));
        self
    }

    /// Register a prepared entry.
    #[must_use]
    pub fn entry(mut self, entry: TransformerEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Set the markup cache.
    ///
    /// Defaults to [`NullCache`], which never hits. An `Arc` around an
    /// `embedder_cache` store works too, keeping a handle outside the
    /// embedder.
    #[must_use]
    pub fn cache<C: EmbedCache + 'static>(mut self, cache: C) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Set a cache that is already shared.
    #[must_use]
    pub fn shared_cache(mut self, cache: Arc<dyn EmbedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the handler that recovers from transformer failures.
    ///
    /// Without a handler a failing transformer fails the whole pass.
    #[must_use]
    pub fn handle_error<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.handle_error = Some(Arc::new(handler));
        self
    }

    /// Choose the driver of [`Embedder::transform`] per call.
    #[must_use]
    pub fn is_async<F>(mut self, is_async: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.is_async = Some(Box::new(is_async));
        self
    }

    /// Finish configuration.
    ///
    /// Fails with [`EmbedError::NoTransformers`] when nothing was registered.
    pub fn build(self) -> Result<Embedder, EmbedError> {
        if self.entries.is_empty() {
            return Err(EmbedError::NoTransformers);
        }

        Ok(Embedder {
            registry: Registry::new(self.entries),
            cache: self.cache.unwrap_or_else(|| Arc::new(NullCache)),
            handle_error: self.handle_error,
            is_async: self.is_async,
        })
    }
}
