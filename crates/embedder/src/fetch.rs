//! Cache-or-render resolution of embed markup.
//!
//! For each resolved candidate the orchestrator:
//! 1. Looks the markup up under [`cache_key`]
//! 2. On a miss, asks the transformer for markup and caches the trimmed result
//! 3. On a render failure, falls back to the error handler (never cached)
//! 4. Splices non-empty markup into the paragraph

use url::Url;

use crate::cache::{EmbedCache, cache_key};
use crate::error::{EmbedError, EmbedFailure, ErrorContext, ErrorHandler, banner};
use crate::splice::splice;
use crate::transformer::{Resolved, TransformerEntry};

/// Shared collaborators for one embed pass.
pub(crate) struct Orchestrator<'e> {
    pub cache: &'e dyn EmbedCache,
    pub handle_error: Option<&'e dyn ErrorHandler>,
}

impl Orchestrator<'_> {
    /// Resolve markup for one candidate and splice it into its paragraph.
    ///
    /// Any failure is reported with the candidate's URL and transformer name.
    pub async fn embed(&self, resolved: Resolved<'_>) -> Result<(), EmbedError> {
        let Resolved { parent, url, entry } = resolved;

        let outcome = match self.resolve_markup(&url, entry).await {
            Ok(Some(markup)) => splice(parent, &markup).map_err(EmbedFailure::from),
            Ok(None) => {
                tracing::debug!("No markup for {url} from {}", entry.name());
                Ok(())
            }
            Err(failure) => Err(failure),
        };

        outcome.map_err(|source| EmbedError::Transformer {
            url: url.into(),
            transformer: entry.name().to_owned(),
            source,
        })
    }

    /// Cached markup, or freshly rendered markup, or the error handler's
    /// replacement.
    async fn resolve_markup(
        &self,
        url: &Url,
        entry: &TransformerEntry,
    ) -> Result<Option<String>, EmbedFailure> {
        let transformer = entry.transformer.as_ref();
        let key = cache_key(transformer.name(), url);

        if let Some(markup) = normalize_markup(self.cache.get(&key).await) {
            tracing::debug!("Cache hit for {key}");
            return Ok(Some(markup));
        }

        match transformer.get_html(url, entry.config.as_ref()).await {
            Ok(html) => {
                let markup = normalize_markup(html);
                self.cache.set(&key, markup.as_deref()).await;
                Ok(markup)
            }
            Err(error) => {
                let Some(handler) = self.handle_error else {
                    return Err(EmbedFailure::Render(error));
                };

                tracing::error!("{}\n\n{error}", banner(url.as_str(), transformer.name()));
                let context = ErrorContext {
                    error: error.as_ref(),
                    url,
                    transformer,
                    config: entry.config.as_ref(),
                };
                let markup = handler
                    .handle(context)
                    .await
                    .map_err(EmbedFailure::Recovery)?;
                Ok(normalize_markup(markup))
            }
        }
    }
}

/// Trim markup; blank markup counts as none.
fn normalize_markup(markup: Option<String>) -> Option<String> {
    let markup = markup?;
    let trimmed = markup.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == markup.len() {
        Some(markup)
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::testing::{Call, CallLog, DeferredCache, MockTransformer};
    use crate::url::normalize_url;
    use embedder_cache::{Cache, MemoryCache, NullCache};
    use embedder_mdast::Paragraph;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    fn embed_one(
        orchestrator: &Orchestrator<'_>,
        entry: &TransformerEntry,
        raw_url: &str,
    ) -> (Paragraph, Result<(), EmbedError>) {
        let mut paragraph = Paragraph::default();
        let resolved = Resolved {
            parent: &mut paragraph,
            url: normalize_url(raw_url).unwrap(),
            entry,
        };
        let result = block_on(orchestrator.embed(resolved));
        (paragraph, result)
    }

    fn fallback_span(context: &ErrorContext<'_>) -> Result<Option<String>, BoxError> {
        Ok(Some(format!(
            "<span>{} failed for {}</span>",
            context.transformer.name(),
            context.url
        )))
    }

    fn failing_handler(_: &ErrorContext<'_>) -> Result<Option<String>, BoxError> {
        Err("handler gave up".into())
    }

    #[test]
    fn test_normalize_markup() {
        assert_eq!(normalize_markup(None), None);
        assert_eq!(normalize_markup(Some(" \n\t".to_owned())), None);
        assert_eq!(normalize_markup(Some("  <b>x</b>\n".to_owned())).as_deref(), Some("<b>x</b>"));
        assert_eq!(normalize_markup(Some("<b>x</b>".to_owned())).as_deref(), Some("<b>x</b>"));
    }

    #[test]
    fn test_miss_renders_and_caches() {
        let cache = MemoryCache::new();
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", "  <div>x</div>\n"));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        assert_eq!(paragraph.data.unwrap().h_name, "div");
        assert_eq!(
            Cache::get(&cache, "remark-embedder:video:https://v.test/1").as_deref(),
            Some("<div>x</div>")
        );
    }

    #[test]
    fn test_hit_skips_render() {
        let log = CallLog::default();
        let cache = MemoryCache::new();
        Cache::set(&cache, "remark-embedder:video:https://v.test/1", Some("<p>cached</p>"));
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", "<div>x</div>").logged(&log));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        assert_eq!(paragraph.data.unwrap().h_name, "p");
        assert_eq!(log.count(|call| matches!(call, Call::GetHtml { .. })), 0);
    }

    #[test]
    fn test_blank_cache_entry_is_a_miss() {
        let log = CallLog::default();
        let cache = MemoryCache::new();
        Cache::set(&cache, "remark-embedder:video:https://v.test/1", Some("   "));
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", "<div>x</div>").logged(&log));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        assert_eq!(paragraph.data.unwrap().h_name, "div");
        assert_eq!(log.count(|call| matches!(call, Call::GetHtml { .. })), 1);
    }

    #[test]
    fn test_blank_render_is_cached_as_none() {
        let cache = MemoryCache::new();
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", " \n "));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        assert!(paragraph.data.is_none());
        assert!(cache.contains_key("remark-embedder:video:https://v.test/1"));
        assert_eq!(Cache::get(&cache, "remark-embedder:video:https://v.test/1"), None);
    }

    #[test]
    fn test_render_failure_without_handler() {
        let orchestrator = Orchestrator {
            cache: &NullCache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::failing("video", "quota exceeded"));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        let err = result.unwrap_err();
        assert!(matches!(
            &err,
            EmbedError::Transformer {
                url,
                transformer,
                source: EmbedFailure::Render(_),
            } if url == "https://v.test/1" && transformer == "video"
        ));
        assert!(err.to_string().ends_with("\n\nquota exceeded"));
        assert!(paragraph.data.is_none());
    }

    #[test]
    fn test_handler_result_is_used_but_not_cached() {
        let cache = MemoryCache::new();
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: Some(&fallback_span),
        };
        let entry = TransformerEntry::new(MockTransformer::failing("video", "quota exceeded"));

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        let data = paragraph.data.unwrap();
        assert_eq!(data.h_name, "span");
        assert!(!cache.contains_key("remark-embedder:video:https://v.test/1"));
    }

    #[test]
    fn test_handler_failure_is_recovery_error() {
        let orchestrator = Orchestrator {
            cache: &NullCache,
            handle_error: Some(&failing_handler),
        };
        let entry = TransformerEntry::new(MockTransformer::failing("video", "quota exceeded"));

        let (_, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            EmbedError::Transformer {
                source: EmbedFailure::Recovery(_),
                ..
            }
        ));
        assert!(err.to_string().ends_with("handler gave up"));
    }

    #[test]
    fn test_non_element_markup_is_markup_error() {
        let orchestrator = Orchestrator {
            cache: &NullCache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", "just text"));

        let (_, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        assert!(matches!(
            result,
            Err(EmbedError::Transformer {
                source: EmbedFailure::Markup(_),
                ..
            })
        ));
    }

    #[test]
    fn test_deferred_cache_and_transformer() {
        let cache = DeferredCache::default();
        let orchestrator = Orchestrator {
            cache: &cache,
            handle_error: None,
        };
        let entry = TransformerEntry::new(MockTransformer::html("video", "<div>x</div>").deferred());

        let (paragraph, result) = embed_one(&orchestrator, &entry, "https://v.test/1");

        result.unwrap();
        assert_eq!(paragraph.data.unwrap().h_name, "div");
        assert_eq!(
            Cache::get(cache.inner(), "remark-embedder:video:https://v.test/1").as_deref(),
            Some("<div>x</div>")
        );
    }
}
