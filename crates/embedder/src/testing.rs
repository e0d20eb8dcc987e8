//! Test doubles shared by the unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use embedder_cache::{Cache, MemoryCache};
use serde_json::Value;
use url::Url;

use crate::cache::EmbedCache;
use crate::deferred::Deferred;
use crate::error::BoxError;
use crate::transformer::Transformer;

/// Suspend once, then complete.
pub(crate) fn yield_once() -> YieldOnce {
    YieldOnce { yielded: false }
}

pub(crate) struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// A recorded transformer invocation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    ShouldTransform { name: String, url: String },
    GetHtml { name: String, url: String },
    Finished { name: String, url: String },
}

impl Call {
    pub fn should(name: &str, url: &str) -> Self {
        Call::ShouldTransform {
            name: name.to_owned(),
            url: url.to_owned(),
        }
    }

    pub fn get(name: &str, url: &str) -> Self {
        Call::GetHtml {
            name: name.to_owned(),
            url: url.to_owned(),
        }
    }

    pub fn finished(name: &str, url: &str) -> Self {
        Call::Finished {
            name: name.to_owned(),
            url: url.to_owned(),
        }
    }
}

/// Shared, ordered record of transformer calls.
#[derive(Clone, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| predicate(call)).count()
    }
}

#[derive(Clone, Copy)]
enum Response {
    Html(&'static str),
    Fail(&'static str),
}

/// Configurable transformer that records what it was asked.
pub(crate) struct MockTransformer {
    name: &'static str,
    accepts: bool,
    response: Response,
    fail_host: Option<&'static str>,
    log: Option<CallLog>,
    deferred: bool,
}

impl MockTransformer {
    /// Accepts every URL and returns `html`.
    pub fn html(name: &'static str, html: &'static str) -> Self {
        Self {
            name,
            accepts: true,
            response: Response::Html(html),
            fail_host: None,
            log: None,
            deferred: false,
        }
    }

    /// Accepts every URL and fails with `message`.
    pub fn failing(name: &'static str, message: &'static str) -> Self {
        Self {
            response: Response::Fail(message),
            ..Self::html(name, "")
        }
    }

    /// Accepts nothing.
    pub fn declining(name: &'static str) -> Self {
        Self {
            accepts: false,
            ..Self::html(name, "")
        }
    }

    /// Fail for URLs on `host` only.
    #[must_use]
    pub fn fail_on(mut self, host: &'static str) -> Self {
        self.fail_host = Some(host);
        self
    }

    #[must_use]
    pub fn logged(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Answer through pending futures that suspend once before completing.
    #[must_use]
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    fn record(&self, call: Call) {
        if let Some(log) = &self.log {
            log.push(call);
        }
    }

    fn respond(&self, url: &Url) -> Result<Option<String>, BoxError> {
        if self.fail_host.is_some() && url.host_str() == self.fail_host {
            return Err(format!("{} cannot render {url}", self.name).into());
        }
        match self.response {
            Response::Html(html) => Ok(Some(html.to_owned())),
            Response::Fail(message) => Err(message.into()),
        }
    }
}

impl Transformer for MockTransformer {
    fn name(&self) -> &str {
        self.name
    }

    fn should_transform<'a>(&'a self, url: &'a Url) -> Deferred<'a, bool> {
        self.record(Call::should(self.name, url.as_str()));
        if self.deferred {
            Deferred::pending(async move {
                yield_once().await;
                self.accepts
            })
        } else {
            Deferred::ready(self.accepts)
        }
    }

    fn get_html<'a>(
        &'a self,
        url: &'a Url,
        _config: Option<&'a Value>,
    ) -> Deferred<'a, Result<Option<String>, BoxError>> {
        self.record(Call::get(self.name, url.as_str()));
        if self.deferred {
            Deferred::pending(async move {
                yield_once().await;
                self.record(Call::finished(self.name, url.as_str()));
                self.respond(url)
            })
        } else {
            self.record(Call::finished(self.name, url.as_str()));
            Deferred::ready(self.respond(url))
        }
    }
}

/// Asynchronous cache over a [`MemoryCache`].
#[derive(Default)]
pub(crate) struct DeferredCache {
    inner: MemoryCache,
}

impl DeferredCache {
    pub fn inner(&self) -> &MemoryCache {
        &self.inner
    }
}

impl EmbedCache for DeferredCache {
    fn get<'a>(&'a self, key: &'a str) -> Deferred<'a, Option<String>> {
        Deferred::pending(async move {
            yield_once().await;
            Cache::get(&self.inner, key)
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Option<&'a str>) -> Deferred<'a, ()> {
        Deferred::pending(async move {
            yield_once().await;
            Cache::set(&self.inner, key, value);
        })
    }
}
