//! Invocation engine shared by both bindings
//!
//! Owns the watch channel, the last dependency key and the in-flight task.
//! Every change of key bumps the generation inside the state; a settlement
//! commits only if its generation is still current, so a superseded call can
//! never overwrite newer state.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::notify::{Notifier, Toast};
use super::state::BindingState;
use crate::error::Result;

/// What a call to `bind` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebind {
    /// Same arguments and dependencies as last time; nothing happened
    Unchanged,
    /// A required argument is absent; settled without calling
    Guarded,
    /// The remote call was started under this generation
    Invoked { generation: u64 },
}

struct Slot<K> {
    key: Option<K>,
    task: Option<JoinHandle<()>>,
}

pub(crate) struct Binder<K, D> {
    state: Arc<watch::Sender<BindingState<D>>>,
    slot: Mutex<Slot<K>>,
    notifier: Arc<dyn Notifier>,
}

impl<K, D> Binder<K, D>
where
    K: PartialEq,
    D: Default + Send + Sync + 'static,
{
    pub(crate) fn new(notifier: Arc<dyn Notifier>) -> Self {
        let (sender, _) = watch::channel(BindingState::new());
        Self {
            state: Arc::new(sender),
            slot: Mutex::new(Slot {
                key: None,
                task: None,
            }),
            notifier,
        }
    }

    /// Re-evaluate the binding for `key`.
    ///
    /// `start` is `None` when the guard rejected the arguments; otherwise it
    /// builds the future of the remote call and is only run if the key changed.
    pub(crate) fn rebind<S, F>(&self, key: K, start: Option<S>) -> Rebind
    where
        S: FnOnce() -> F,
        F: Future<Output = Result<D>> + Send + 'static,
    {
        let mut slot = self.slot.lock();
        if slot.key.as_ref() == Some(&key) {
            return Rebind::Unchanged;
        }
        slot.key = Some(key);

        if let Some(pending) = slot.task.take() {
            pending.abort();
        }

        let Some(start) = start else {
            self.state.send_modify(|s| {
                s.generation += 1;
                s.data = D::default();
                s.loading = false;
                s.error = None;
            });
            debug!("Binding guarded: required argument absent");
            return Rebind::Guarded;
        };

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.loading = true;
            generation = s.generation;
        });

        let pending = start();
        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        slot.task = Some(tokio::spawn(async move {
            let outcome = pending.await;
            settle(&state, generation, outcome, notifier.as_ref());
        }));

        debug!(generation, "Binding invoked");
        Rebind::Invoked { generation }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<BindingState<D>> {
        self.state.subscribe()
    }

    pub(crate) fn snapshot(&self) -> BindingState<D>
    where
        D: Clone,
    {
        self.state.borrow().clone()
    }

    /// Wait until the current invocation has settled
    pub(crate) async fn settled(&self) -> BindingState<D>
    where
        D: Clone,
    {
        let mut receiver = self.state.subscribe();
        let settled = match receiver.wait_for(|s| !s.loading).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.snapshot())
    }
}

impl<K, D> Drop for Binder<K, D> {
    fn drop(&mut self) {
        if let Some(pending) = self.slot.get_mut().task.take() {
            pending.abort();
        }
        // Supersede anything still settling without waking receivers
        self.state.send_if_modified(|s| {
            s.generation += 1;
            false
        });
    }
}

/// Commit `outcome` if `generation` is still current.
///
/// Returns whether the outcome was committed. A committed failure pushes
/// exactly one error toast; stale outcomes are dropped silently.
pub(crate) fn settle<D>(
    state: &watch::Sender<BindingState<D>>,
    generation: u64,
    outcome: Result<D>,
    notifier: &dyn Notifier,
) -> bool {
    let mut failure = None;
    let committed = state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        match outcome {
            Ok(data) => {
                s.data = data;
                s.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                s.error = Some(message.clone());
                failure = Some(message);
            }
        }
        s.loading = false;
        true
    });

    if !committed {
        trace!(generation, "Dropping stale settlement");
        return false;
    }

    if let Some(message) = failure {
        warn!(generation, error = %message, "Remote call failed");
        notifier.notify(Toast::error(message));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::notify::ToastLog;
    use crate::error::PesoError;

    fn not_found() -> PesoError {
        PesoError::Request {
            status: 404,
            message: "Not found".to_string(),
        }
    }

    fn sender_at(generation: u64) -> watch::Sender<BindingState<Option<u32>>> {
        let (sender, _) = watch::channel(BindingState {
            data: None,
            loading: true,
            error: None,
            generation,
        });
        sender
    }

    #[test]
    fn settle_commits_current_generation() {
        let state = sender_at(3);
        let toasts = ToastLog::new();

        assert!(settle(&state, 3, Ok(Some(7)), &toasts));

        let s = state.borrow();
        assert_eq!(s.data, Some(7));
        assert!(!s.loading);
        assert!(toasts.is_empty());
    }

    #[test]
    fn settle_drops_stale_generation() {
        let state = sender_at(2);
        let toasts = ToastLog::new();

        assert!(!settle(&state, 1, Ok(Some(1)), &toasts));
        assert!(!settle(&state, 1, Err(not_found()), &toasts));

        let s = state.borrow();
        assert_eq!(s.data, None);
        assert!(s.loading);
        assert!(toasts.is_empty());
    }

    #[test]
    fn settle_failure_keeps_data_and_toasts_once() {
        let state = sender_at(1);
        state.send_modify(|s| s.data = Some(5));
        let toasts = ToastLog::new();

        assert!(settle(&state, 1, Err(not_found()), &toasts));

        let s = state.borrow();
        assert_eq!(s.error.as_deref(), Some("Not found"));
        assert_eq!(s.data, Some(5));
        assert!(!s.loading);
        assert_eq!(toasts.errors(), vec!["Not found"]);
    }

    #[tokio::test]
    async fn guarded_rebind_settles_synchronously() {
        let binder: Binder<u8, Option<u32>> = Binder::new(Arc::new(ToastLog::new()));
        let outcome = binder.rebind(1, None::<fn() -> std::future::Ready<Result<Option<u32>>>>);

        assert_eq!(outcome, Rebind::Guarded);
        let s = binder.snapshot();
        assert!(!s.loading);
        assert_eq!(s.data, None);
        assert_eq!(s.generation, 1);
    }

    #[tokio::test]
    async fn same_key_is_unchanged() {
        let binder: Binder<u8, Option<u32>> = Binder::new(Arc::new(ToastLog::new()));
        let start = || std::future::ready(Ok(Some(1)));

        assert_eq!(binder.rebind(4, Some(start)), Rebind::Invoked { generation: 1 });
        assert_eq!(binder.rebind(4, Some(start)), Rebind::Unchanged);
        assert_eq!(binder.settled().await.data, Some(1));
    }

    #[tokio::test]
    async fn drop_supersedes_pending_call() {
        let binder: Binder<u8, Option<u32>> = Binder::new(Arc::new(ToastLog::new()));
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        binder.rebind(1, Some(move || async move { Ok(rx.await.ok()) }));
        let mut receiver = binder.subscribe();

        drop(binder);
        let _ = tx.send(9);
        tokio::task::yield_now().await;

        assert_eq!(receiver.borrow_and_update().data, None);
    }
}
