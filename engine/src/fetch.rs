//! The fetch capability injected into a page builder.

use std::future::Future;
use std::pin::Pin;

use mosaic_types::FetchError;

/// Fetch future type alias.
pub type FetchFut<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Retrieves the raw body for an already-expanded URL.
///
/// Timeouts, retries and caching belong to the implementation; the builder
/// waits for whatever the returned future does.
pub trait Fetch: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFut<'a>;
}

/// Any `Fn(String) -> impl Future<Output = Result<String, FetchError>>` is a fetcher.
impl<F, Fut> Fetch for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, FetchError>> + Send + 'static,
{
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFut<'a> {
        Box::pin(self(url.to_string()))
    }
}
