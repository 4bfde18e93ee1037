use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Rendezvous-based collective: every member of a `size`-wide group
/// contributes one value and every member receives the full, rank-ordered
/// result once the last contribution lands. All-gather, barrier, and
/// broadcast-from-root in `group.rs` are each a thin wrapper over this one
/// primitive (spec.md §6 lists them as distinct fabric capabilities, but the
/// reference implementation's MPI backs all of them with the same
/// rendezvous, and so do we).
///
/// The member that completes the buffer computes the result and publishes it
/// on the broadcast channel; everyone else subscribes *before* checking
/// whether the buffer is already complete, so there is no window in which a
/// late arrival's publish could be missed.
pub struct Collective<T: Clone + Send + 'static> {
    size: usize,
    buffer: Mutex<Vec<Option<T>>>,
    channel: broadcast::Sender<Vec<T>>,
}

impl<T: Clone + Send + 'static> Collective<T> {
    pub fn new(size: usize) -> Arc<Self> {
        let (channel, _) = broadcast::channel(1);
        Arc::new(Self {
            size,
            buffer: Mutex::new((0..size).map(|_| None).collect()),
            channel,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// All-gather `value` from `local_index` into the rank-ordered vector of
    /// every member's contribution. `local_index` must be this member's
    /// position within the group (not necessarily its global rank).
    pub async fn all_gather(&self, local_index: usize, value: T) -> Vec<T> {
        debug_assert!(local_index < self.size, "local_index out of bounds for this group");

        let mut rx = self.channel.subscribe();
        let completed = {
            let mut buf = self.buffer.lock();
            buf[local_index] = Some(value);
            buf.iter().all(Option::is_some)
        };

        if completed {
            let result: Vec<T> = {
                let mut buf = self.buffer.lock();
                buf.iter_mut().map(|slot| slot.take().expect("slot filled by completion check")).collect()
            };
            // No other subscriber can exist yet for the *next* round, so a
            // send failing with no receivers (everyone already returned via
            // this branch, e.g. a group of one) is not an error.
            let _ = self.channel.send(result.clone());
            result
        } else {
            rx.recv().await.expect("collective channel dropped while a member was still waiting")
        }
    }

    /// Barrier: an all-gather of `()` whose result nobody inspects.
    pub async fn barrier(&self, local_index: usize) {
        self.all_gather(local_index, ()).await;
    }
}
