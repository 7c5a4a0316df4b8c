//! List fetch binding
//!
//! Same lifecycle as [`super::FetchOne`], for collection endpoints: the call
//! also receives a [`PageRequest`], its answer is normalized through
//! [`Listing`], and `data` is always a list.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;

use super::args::ArgumentVector;
use super::engine::{Binder, Rebind};
use super::listing::{IntoListing, Listing, PageRequest};
use super::notify::Notifier;
use super::state::BindingState;
use crate::error::Result;

type ListCall<R, T> =
    Arc<dyn Fn(R, PageRequest) -> BoxFuture<'static, Result<Listing<T>>> + Send + Sync>;

/// `{data: Vec<T>, loading, error}` bound to one collection call
pub struct FetchList<A: ArgumentVector, D, T> {
    call: ListCall<A::Resolved, T>,
    binder: Binder<(A, D, PageRequest), Vec<T>>,
    default_page: PageRequest,
}

impl<A, D, T> FetchList<A, D, T>
where
    A: ArgumentVector,
    D: PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Bind `call`; its answer may be anything convertible into a [`Listing`]
    /// (a raw JSON value, a page, a plain vector). An answer whose items do
    /// not decode settles as a failure.
    pub fn new<F, Fut, R>(call: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: Fn(A::Resolved, PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoListing<T> + 'static,
    {
        Self {
            call: Arc::new(move |args, page| {
                call(args, page)
                    .map(|outcome| outcome.and_then(<R as IntoListing<T>>::into_listing))
                    .boxed()
            }),
            binder: Binder::new(notifier),
            default_page: PageRequest::default(),
        }
    }

    /// Page used by [`FetchList::bind`] (default: page 0, size 1000)
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.default_page.size = size;
        self
    }

    /// Re-evaluate with the default page
    pub fn bind(&self, args: A, deps: D) -> Rebind {
        self.bind_page(args, deps, self.default_page)
    }

    /// Re-evaluate for a specific page; the page is part of the dependency key
    pub fn bind_page(&self, args: A, deps: D, page: PageRequest) -> Rebind {
        let start = args.resolve().map(|resolved| {
            let call = Arc::clone(&self.call);
            move || call(resolved, page).map(|outcome| outcome.map(Listing::into_vec))
        });
        self.binder.rebind((args, deps, page), start)
    }

    pub fn subscribe(&self) -> watch::Receiver<BindingState<Vec<T>>> {
        self.binder.subscribe()
    }

    pub fn snapshot(&self) -> BindingState<Vec<T>>
    where
        T: Clone,
    {
        self.binder.snapshot()
    }

    /// Wait for the current invocation to settle
    pub async fn settled(&self) -> BindingState<Vec<T>>
    where
        T: Clone,
    {
        self.binder.settled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::notify::ToastLog;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn page_and_size_reach_the_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let binding: FetchList<(i64,), (), Value> = FetchList::new(
            move |(id,): (i64,), page: PageRequest| {
                record.lock().push((id, page));
                async move { Ok(json!([])) }
            },
            Arc::new(ToastLog::new()),
        );

        binding.bind((3,), ());
        binding.settled().await;
        binding.bind_page((3,), (), PageRequest::new(2, 25));
        binding.settled().await;

        assert_eq!(
            *seen.lock(),
            vec![(3, PageRequest::new(0, 1000)), (3, PageRequest::new(2, 25))]
        );
    }

    #[tokio::test]
    async fn configured_page_size_is_used() {
        let binding: FetchList<(), (), Value> = FetchList::new(
            |(): (), page: PageRequest| async move { Ok(vec![json!(page.size)]) },
            Arc::new(ToastLog::new()),
        )
        .with_page_size(50);

        binding.bind((), ());
        assert_eq!(binding.settled().await.data, vec![json!(50)]);
    }

    #[tokio::test]
    async fn guarded_list_is_empty_not_loading() {
        let binding: FetchList<(Option<i64>,), (), Value> = FetchList::new(
            |(_id,): (i64,), _page: PageRequest| async { Ok(json!([1, 2])) },
            Arc::new(ToastLog::new()),
        );

        assert_eq!(binding.bind((None,), ()), Rebind::Guarded);
        let state = binding.snapshot();
        assert!(state.data.is_empty());
        assert!(!state.loading);
    }
}
