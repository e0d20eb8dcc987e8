//! Error types and recovery hooks.

use embedder_mdast::hast::FragmentError;
use serde_json::Value;
use url::Url;

use crate::consts::NAMESPACE;
use crate::deferred::Deferred;
use crate::transformer::Transformer;

/// Error type returned by transformers and error handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error returned by an embed pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EmbedError {
    /// Embedding one URL failed.
    #[error("{}\n\n{source}", banner(.url, .transformer))]
    Transformer {
        /// Normalized URL of the failing candidate.
        url: String,
        /// Name of the transformer selected for it.
        transformer: String,
        /// What went wrong.
        #[source]
        source: EmbedFailure,
    },

    /// The embedder was built without transformers.
    #[error("at least one transformer must be registered")]
    NoTransformers,
}

/// The stage at which embedding a URL failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EmbedFailure {
    /// The transformer failed and no error handler was configured.
    #[error("{0}")]
    Render(BoxError),

    /// The error handler itself failed.
    #[error("{0}")]
    Recovery(BoxError),

    /// The markup could not be turned into an element.
    #[error(transparent)]
    Markup(#[from] FragmentError),
}

/// The header logged and reported for a failed embed.
///
/// ```
/// use embedder::banner;
///
/// assert_eq!(
///     banner("https://a.test/", "video"),
///     "The following error occurred while processing `https://a.test/` with the remark-embedder transformer `video`:"
/// );
/// ```
pub fn banner(url: &str, transformer: &str) -> String {
    format!(
        "The following error occurred while processing `{url}` with the {NAMESPACE} transformer `{transformer}`:"
    )
}

/// Everything an error handler knows about a failed `get_html` call.
pub struct ErrorContext<'a> {
    pub error: &'a (dyn std::error::Error + Send + Sync + 'static),
    pub url: &'a Url,
    pub transformer: &'a dyn Transformer,
    pub config: Option<&'a Value>,
}

impl std::fmt::Debug for ErrorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorContext")
            .field("error", &self.error)
            .field("url", &self.url.as_str())
            .field("transformer", &self.transformer.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Recovers from a failed `get_html` call with replacement markup.
///
/// The replacement is never cached. Returning `Ok(None)` leaves the paragraph
/// unchanged; returning an error fails the pass.
///
/// Plain functions and closures taking `&ErrorContext` implement this trait.
pub trait ErrorHandler: Send + Sync {
    fn handle<'a>(&'a self, context: ErrorContext<'a>) -> Deferred<'a, Result<Option<String>, BoxError>>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&ErrorContext<'_>) -> Result<Option<String>, BoxError> + Send + Sync,
{
    fn handle<'a>(&'a self, context: ErrorContext<'a>) -> Deferred<'a, Result<Option<String>, BoxError>> {
        Deferred::ready(self(&context))
    }
}
