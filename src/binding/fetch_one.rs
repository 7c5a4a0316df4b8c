//! Single-item fetch binding
//!
//! Ties one "fetch one record" call to a consumer. Call [`FetchOne::bind`]
//! whenever inputs may have changed; observe results through
//! [`FetchOne::subscribe`].

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;

use super::args::ArgumentVector;
use super::engine::{Binder, Rebind};
use super::notify::Notifier;
use super::state::BindingState;
use crate::error::Result;

type OneCall<R, T> = Arc<dyn Fn(R) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// `{data: Option<T>, loading, error}` bound to one remote call
///
/// - absent required argument: never calls, settles to `data: None`
/// - same `(args, deps)` as last time: nothing happens
/// - new `(args, deps)`: aborts the pending call and starts over; only the
///   latest call may commit
pub struct FetchOne<A: ArgumentVector, D, T> {
    call: OneCall<A::Resolved, T>,
    binder: Binder<(A, D), Option<T>>,
}

impl<A, D, T> FetchOne<A, D, T>
where
    A: ArgumentVector,
    D: PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Bind `call`; failures are pushed to `notifier`
    pub fn new<F, Fut>(call: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: Fn(A::Resolved) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            call: Arc::new(move |args| call(args).boxed()),
            binder: Binder::new(notifier),
        }
    }

    /// Re-evaluate with the current arguments and extra dependencies.
    ///
    /// Must run inside a tokio runtime.
    pub fn bind(&self, args: A, deps: D) -> Rebind {
        let start = args.resolve().map(|resolved| {
            let call = Arc::clone(&self.call);
            move || call(resolved).map(|outcome| outcome.map(Some))
        });
        self.binder.rebind((args, deps), start)
    }

    pub fn subscribe(&self) -> watch::Receiver<BindingState<Option<T>>> {
        self.binder.subscribe()
    }

    pub fn snapshot(&self) -> BindingState<Option<T>>
    where
        T: Clone,
    {
        self.binder.snapshot()
    }

    /// Wait for the current invocation to settle.
    ///
    /// Before the first `bind` the state is loading and this waits for it.
    pub async fn settled(&self) -> BindingState<Option<T>>
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
    use crate::error::PesoError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn success_publishes_data() {
        let binding: FetchOne<(i64,), (), String> = FetchOne::new(
            |(id,): (i64,)| async move { Ok(format!("job-{}", id)) },
            Arc::new(ToastLog::new()),
        );

        assert_eq!(binding.bind((7,), ()), Rebind::Invoked { generation: 1 });
        assert!(binding.snapshot().loading);

        let state = binding.settled().await;
        assert_eq!(state.data.as_deref(), Some("job-7"));
        assert!(state.is_ready());
    }

    #[tokio::test]
    async fn absent_argument_never_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let binding: FetchOne<(Option<i64>,), (), i64> = FetchOne::new(
            move |(id,): (i64,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(id) }
            },
            Arc::new(ToastLog::new()),
        );

        assert_eq!(binding.bind((None,), ()), Rebind::Guarded);

        let state = binding.snapshot();
        assert!(!state.loading);
        assert_eq!(state.data, None);
        assert_eq!(state.error, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_sets_error_and_toasts() {
        let toasts = ToastLog::new();
        let binding: FetchOne<(), (), i64> = FetchOne::new(
            |(): ()| async {
                Err(PesoError::Request {
                    status: 500,
                    message: "Request failed".into(),
                })
            },
            Arc::new(toasts.clone()),
        );

        binding.bind((), ());
        let state = binding.settled().await;

        assert_eq!(state.error.as_deref(), Some("Request failed"));
        assert!(!state.loading);
        assert_eq!(toasts.errors(), vec!["Request failed"]);
    }
}
