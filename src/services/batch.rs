use std::future::Future;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;
use crate::services::http::RequestOptions;

/// How the requests of one batch are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// One request at a time, in input order.
    #[default]
    Sequential,
    /// Up to `limit` requests in flight. Results are still reported in
    /// input order.
    Concurrent { limit: usize },
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub cancel: Option<CancellationToken>,
    pub dispatch: Dispatch,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.dispatch = Dispatch::Concurrent { limit: limit.max(1) };
        self
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions { cancel: self.cancel.clone() }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Runs `op` once per item and returns the per-item results in input order.
///
/// Per-item errors are returned to the caller untouched, except
/// [`ApiError::Cancelled`]: once the token fires the whole call fails and no
/// partial results are returned.
pub(crate) async fn drive<T, R, F, Fut>(
    items: impl IntoIterator<Item = T>,
    options: &BatchOptions,
    op: F,
) -> Result<Vec<Result<R, ApiError>>, ApiError>
where
    F: Fn(T, RequestOptions) -> Fut,
    Fut: Future<Output = Result<R, ApiError>>,
{
    let results = match options.dispatch {
        Dispatch::Sequential => {
            let mut results = Vec::new();
            for (index, item) in items.into_iter().enumerate() {
                if options.is_cancelled() {
                    debug!(index, "batch cancelled before request");
                    return Err(ApiError::Cancelled);
                }
                let result = op(item, options.request_options()).await;
                if matches!(result, Err(ApiError::Cancelled)) || options.is_cancelled() {
                    return Err(ApiError::Cancelled);
                }
                results.push(result);
            }
            results
        }
        Dispatch::Concurrent { limit } => {
            if options.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            let joined = stream::iter(items)
                .map(|item| op(item, options.request_options()))
                .buffered(limit.max(1))
                .collect::<Vec<_>>();

            let results = match &options.cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ApiError::Cancelled),
                    results = joined => results,
                },
                None => joined.await,
            };

            if options.is_cancelled() || results.iter().any(|r| matches!(r, Err(ApiError::Cancelled))) {
                return Err(ApiError::Cancelled);
            }
            results
        }
    };

    Ok(results)
}

