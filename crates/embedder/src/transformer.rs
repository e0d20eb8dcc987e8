//! Transformers and the ordered registry that selects between them.

use std::sync::Arc;

use embedder_mdast::Paragraph;
use serde_json::Value;
use url::Url;

use crate::deferred::Deferred;
use crate::error::BoxError;
use crate::scan::Candidate;

/// Turns URLs it recognizes into embeddable HTML.
///
/// Both methods return [`Deferred`] so implementations may answer
/// synchronously ([`Deferred::ready`]) or asynchronously
/// ([`Deferred::pending`]).
pub trait Transformer: Send + Sync {
    /// Identifier used in cache keys and error messages.
    fn name(&self) -> &str;

    /// Whether this transformer handles `url`.
    fn should_transform<'a>(&'a self, url: &'a Url) -> Deferred<'a, bool>;

    /// Produce markup for `url`.
    ///
    /// `Ok(None)` (or blank markup) means there is nothing to embed and the
    /// paragraph is left alone. `config` is the value registered alongside
    /// this transformer, if any.
    fn get_html<'a>(
        &'a self,
        url: &'a Url,
        config: Option<&'a Value>,
    ) -> Deferred<'a, Result<Option<String>, BoxError>>;
}

impl<T: Transformer + ?Sized> Transformer for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn should_transform<'a>(&'a self, url: &'a Url) -> Deferred<'a, bool> {
        (**self).should_transform(url)
    }

    fn get_html<'a>(
        &'a self,
        url: &'a Url,
        config: Option<&'a Value>,
    ) -> Deferred<'a, Result<Option<String>, BoxError>> {
        (**self).get_html(url, config)
    }
}

/// Synchronous transformer built from two closures.
///
/// # Example
///
/// ```
/// use embedder::FnTransformer;
///
/// let transformer = FnTransformer::new(
///     "example",
///     |url| url.host_str() == Some("example.com"),
///     |url, _config| Ok(Some(format!(r#"<iframe src="{url}"></iframe>"#))),
/// );
/// ```
pub struct FnTransformer<S, G> {
    name: String,
    should_transform: S,
    get_html: G,
}

impl<S, G> FnTransformer<S, G> {
    /// Create a transformer named `name`.
    pub fn new(name: impl Into<String>, should_transform: S, get_html: G) -> Self
    where
        S: Fn(&Url) -> bool + Send + Sync,
        G: Fn(&Url, Option<&Value>) -> Result<Option<String>, BoxError> + Send + Sync,
    {
        Self {
            name: name.into(),
            should_transform,
            get_html,
        }
    }
}

impl<S, G> Transformer for FnTransformer<S, G>
where
    S: Fn(&Url) -> bool + Send + Sync,
    G: Fn(&Url, Option<&Value>) -> Result<Option<String>, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn should_transform<'a>(&'a self, url: &'a Url) -> Deferred<'a, bool> {
        Deferred::ready((self.should_transform)(url))
    }

    fn get_html<'a>(
        &'a self,
        url: &'a Url,
        config: Option<&'a Value>,
    ) -> Deferred<'a, Result<Option<String>, BoxError>> {
        Deferred::ready((self.get_html)(url, config))
    }
}

/// A registered transformer with its optional configuration.
#[derive(Clone)]
pub struct TransformerEntry {
    pub transformer: Arc<dyn Transformer>,
    pub config: Option<Value>,
}

impl TransformerEntry {
    /// Register `transformer` without configuration.
    pub fn new<T: Transformer + 'static>(transformer: T) -> Self {
        Self {
            transformer: Arc::new(transformer),
            config: None,
        }
    }

    /// Attach configuration passed to every `get_html` call.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Name of the wrapped transformer.
    pub fn name(&self) -> &str {
        self.transformer.name()
    }
}

impl std::fmt::Debug for TransformerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerEntry")
            .field("transformer", &self.transformer.name())
            .field("config", &self.config)
            .finish()
    }
}

/// A candidate paired with the transformer chosen for it.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub parent: &'a mut Paragraph,
    pub url: Url,
    pub entry: &'a TransformerEntry,
}

/// Ordered list of transformers; the first willing one wins.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<TransformerEntry>,
}

impl Registry {
    /// Create a registry from entries in priority order.
    pub fn new(entries: Vec<TransformerEntry>) -> Self {
        Self { entries }
    }

    /// Registered entries in priority order.
    pub fn entries(&self) -> &[TransformerEntry] {
        &self.entries
    }

    /// First transformer whose `should_transform` accepts `url`.
    ///
    /// Later transformers are not consulted once one accepts.
    pub async fn select(&self, url: &Url) -> Option<&TransformerEntry> {
        for entry in &self.entries {
            if entry.transformer.should_transform(url).await {
                tracing::debug!("Selected transformer {} for {url}", entry.name());
                return Some(entry);
            }
        }
        None
    }

    /// Select a transformer for every candidate, one after another in
    /// document order.
    ///
    /// Candidates no transformer accepts are dropped.
    pub async fn select_all<'a>(&'a self, candidates: Vec<Candidate<'a>>) -> Vec<Resolved<'a>> {
        let mut resolved = Vec::with_capacity(candidates.len());
        for Candidate { parent, url } in candidates {
            if let Some(entry) = self.select(&url).await {
                resolved.push(Resolved { parent, url, entry });
            }
        }
        resolved
    }
}
