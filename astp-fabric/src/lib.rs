//! In-process messaging fabric (spec.md §6).
//!
//! Every participant runs as its own `tokio::task` rather than its own OS
//! process, so there is no real wire between them — but the *contract* is
//! the one the reference implementation's MPI layer provides: a global
//! group and zone sub-groups, non-blocking point-to-point send, probe and
//! receive, all-gather, SUM-reduce, broadcast, and barriers. [`Fabric`] is
//! the handle every participant task is given at spawn; everything else in
//! this crate exists to implement the contract in terms of ordinary async
//! Rust.

mod collective;
mod error;
mod group;
mod mailbox;

pub use error::FabricError;
pub use group::{GlobalGroup, ZoneGroup};
pub use mailbox::Envelope;

use astp_core::Rank;
use collective::Collective;
use mailbox::MailboxHub;
use std::sync::Arc;

/// World-scoped fabric state: one [`MailboxHub`] and one set of global-group
/// collectives, shared by every participant for the lifetime of the run.
pub struct Fabric {
    n: usize,
    mailboxes: Arc<MailboxHub>,
    row_gather: Arc<Collective<Vec<f64>>>,
    pair_gather: Arc<Collective<(f64, f64)>>,
    duration_bcast: Arc<Collective<Option<f64>>>,
    metrics_reduce: Arc<Collective<(f64, u64)>>,
    barrier: Arc<Collective<()>>,
}

impl Fabric {
    pub fn new(n: usize) -> Arc<Self> {
        Arc::new(Self {
            n,
            mailboxes: Arc::new(MailboxHub::new(n)),
            row_gather: Collective::new(n),
            pair_gather: Collective::new(n),
            duration_bcast: Collective::new(n),
            metrics_reduce: Collective::new(n),
            barrier: Collective::new(n),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// The handle a participant with the given rank uses for global-group
    /// operations (spec.md §6).
    pub fn global_group(&self, rank: Rank) -> GlobalGroup {
        GlobalGroup::new(
            rank,
            self.n,
            self.row_gather.clone(),
            self.pair_gather.clone(),
            self.duration_bcast.clone(),
            self.metrics_reduce.clone(),
            self.barrier.clone(),
        )
    }

    /// Split the global group by `colours[rank]` (spec.md §4.1 "Group
    /// re-creation"). `colours` must have one entry per rank and must agree
    /// across every participant calling `split` for the same round — the
    /// caller (`astp-zones`) guarantees this via its own all-gather before
    /// ever calling here.
    pub fn split(&self, rank: Rank, colours: &[u32]) -> Result<ZoneGroup, FabricError> {
        let my_colour = colours[rank];
        let members: Vec<Rank> = (0..self.n).filter(|&r| colours[r] == my_colour).collect();
        let local_rank = members.iter().position(|&r| r == rank).ok_or(FabricError::NotAMember(rank))?;
        Ok(ZoneGroup::new(members, local_rank, my_colour, self.mailboxes.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn split_groups_members_by_colour_in_ascending_rank_order() {
        let fabric = Fabric::new(4);
        let colours = vec![1, 0, 1, 0];
        let zone0 = fabric.split(1, &colours).unwrap();
        assert_eq!(zone0.members(), &[1, 3]);
        assert_eq!(zone0.local_rank(), 0);

        let zone1 = fabric.split(2, &colours).unwrap();
        assert_eq!(zone1.members(), &[0, 2]);
        assert_eq!(zone1.local_rank(), 1);
    }

    #[tokio::test]
    async fn zone_point_to_point_delivers_only_to_other_members() {
        let fabric = Fabric::new(3);
        let colours = vec![0, 0, 1];
        let zone_a_r0 = fabric.split(0, &colours).unwrap();
        let zone_a_r1 = fabric.split(1, &colours).unwrap();
        let zone_b = fabric.split(2, &colours).unwrap();

        let tx = astp_core::Transaction::new(1, 0, 1, 10.0, [-1, -1], 0, astp_core::Phase::Normal, 0.0);
        zone_a_r0.broadcast_to_others(tx).unwrap();

        assert!(zone_a_r1.probe().await);
        assert!(!zone_b.probe().await);
        assert!(zone_a_r1.try_receive().await.is_some());
    }

    #[tokio::test]
    async fn global_barrier_releases_every_rank() {
        let fabric = Fabric::new(3);
        let groups: Vec<_> = (0..3).map(|r| fabric.global_group(r)).collect();
        let handles: Vec<_> = groups
            .into_iter()
            .map(|g| tokio::spawn(async move { g.barrier().await }))
            .collect();
        for h in handles {
            h.await.unwrap();
        }
    }
}
