//! The single serialized update path for a subscription's state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{FetchError, SyncError};
use crate::realtime::LinkState;
use crate::snapshot::PresenceSnapshot;

use super::types::SyncState;

/// Owner of the `watch` sender. Every mutation runs under the channel's
/// lock; once sealed, all further mutations are rejected.
pub(crate) struct StateCell {
    tx: watch::Sender<SyncState>,
    sealed: AtomicBool,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(SyncState::default());
        Self {
            tx,
            sealed: AtomicBool::new(false),
        }
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<SyncState> {
        self.tx.subscribe()
    }

    pub(crate) fn current(&self) -> SyncState {
        self.tx.borrow().clone()
    }

    /// Apply `f` unless sealed. `f` reports whether it changed anything;
    /// receivers are only notified when it did.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut SyncState) -> bool) -> bool {
        self.tx.send_if_modified(|state| {
            if self.sealed.load(Ordering::Acquire) {
                return false;
            }
            f(state)
        })
    }

    /// Mark the link down and reject every later mutation.
    ///
    /// The flag flips under the channel lock, so a mutation either
    /// completed before this returns or never happens.
    pub(crate) fn seal(&self) {
        self.tx.send_if_modified(|state| {
            if self.sealed.swap(true, Ordering::AcqRel) {
                return false;
            }
            let changed = state.link != LinkState::Disconnected;
            state.link = LinkState::Disconnected;
            changed
        });
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    // -- Fetch path ---------------------------------------------------------

    pub(crate) fn begin_refresh(&self) -> bool {
        self.modify(|state| !std::mem::replace(&mut state.is_loading, true))
    }

    /// Settle a fetch. Success overwrites the snapshot and clears the
    /// error; failure records it and leaves the snapshot alone.
    pub(crate) fn fetch_settled(
        &self,
        result: Result<PresenceSnapshot, FetchError>,
        clear_loading: bool,
    ) -> bool {
        self.modify(|state| {
            let mut changed = false;
            match result {
                Ok(snapshot) => {
                    changed |= replace_if_differs(&mut state.snapshot, snapshot);
                    changed |= state.last_error.take().is_some();
                }
                Err(err) => {
                    state.last_error = Some(SyncError::Fetch(err));
                    changed = true;
                }
            }
            if clear_loading && state.is_loading {
                state.is_loading = false;
                changed = true;
            }
            changed
        })
    }

    // -- Stream path --------------------------------------------------------

    /// Initial state from the stream always overwrites.
    pub(crate) fn adopt_snapshot(&self, snapshot: PresenceSnapshot) -> bool {
        self.modify(|state| {
            state.snapshot = Some(Arc::new(snapshot));
            true
        })
    }

    /// Replace the snapshot only when the content differs.
    pub(crate) fn merge_update(&self, snapshot: PresenceSnapshot) -> bool {
        self.modify(|state| replace_if_differs(&mut state.snapshot, snapshot))
    }

    pub(crate) fn record_error(&self, err: SyncError) -> bool {
        self.modify(|state| {
            state.last_error = Some(err);
            true
        })
    }

    pub(crate) fn set_link(&self, link: LinkState) -> bool {
        self.modify(|state| std::mem::replace(&mut state.link, link) != link)
    }
}

fn replace_if_differs(slot: &mut Option<Arc<PresenceSnapshot>>, snapshot: PresenceSnapshot) -> bool {
    if slot.as_deref() == Some(&snapshot) {
        return false;
    }
    *slot = Some(Arc::new(snapshot));
    true
}
