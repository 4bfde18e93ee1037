use crate::collective::Collective;
use crate::mailbox::{Envelope, MailboxHub};
use astp_core::Rank;
use std::sync::Arc;

/// The fixed group spanning every participant (spec.md §6: "a global group").
/// Lives for the whole run; its collectives are reused across every
/// zone-formation round rather than recreated.
pub struct GlobalGroup {
    rank: Rank,
    n: usize,
    row_gather: Arc<Collective<Vec<f64>>>,
    pair_gather: Arc<Collective<(f64, f64)>>,
    duration_bcast: Arc<Collective<Option<f64>>>,
    metrics_reduce: Arc<Collective<(f64, u64)>>,
    barrier: Arc<Collective<()>>,
}

impl GlobalGroup {
    pub(crate) fn new(
        rank: Rank,
        n: usize,
        row_gather: Arc<Collective<Vec<f64>>>,
        pair_gather: Arc<Collective<(f64, f64)>>,
        duration_bcast: Arc<Collective<Option<f64>>>,
        metrics_reduce: Arc<Collective<(f64, u64)>>,
        barrier: Arc<Collective<()>>,
    ) -> Self {
        Self { rank, n, row_gather, pair_gather, duration_bcast, metrics_reduce, barrier }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// All-gather of similarity-matrix rows (spec.md §4.1).
    pub async fn all_gather_rows(&self, row: Vec<f64>) -> Vec<Vec<f64>> {
        self.row_gather.all_gather(self.rank, row).await
    }

    /// All-gather of `(x, y)` geography coordinates for the latency
    /// bootstrap (spec.md §1 bootstrap contract).
    pub async fn all_gather_coords(&self, coord: (f64, f64)) -> Vec<(f64, f64)> {
        self.pair_gather.all_gather(self.rank, coord).await
    }

    /// Broadcast the experiment duration from rank 0 (spec.md §4.7 startup).
    /// Only rank 0 should pass `Some`; every other caller passes `None`.
    pub async fn broadcast_duration(&self, duration_secs: Option<f64>) -> f64 {
        let gathered = self.duration_bcast.all_gather(self.rank, duration_secs).await;
        gathered[0].expect("rank 0 must supply the broadcast duration")
    }

    /// SUM-reduce per-rank `(tps, finalized_count)` to rank 0 (spec.md §6).
    /// Returns `None` on every rank but 0.
    pub async fn reduce_metrics(&self, tps: f64, finalized: u64) -> Option<(f64, u64)> {
        let gathered = self.metrics_reduce.all_gather(self.rank, (tps, finalized)).await;
        if self.rank == 0 {
            let total_tps = gathered.iter().map(|(t, _)| t).sum();
            let total_finalized = gathered.iter().map(|(_, f)| f).sum();
            Some((total_tps, total_finalized))
        } else {
            None
        }
    }

    pub async fn barrier(&self) {
        self.barrier.barrier(self.rank).await;
    }
}

/// A colour-split sub-group of the global group (spec.md §6: "split the
/// global group by colour"). Re-created whenever zone formation re-runs;
/// its point-to-point traffic rides the world-scoped [`MailboxHub`] so
/// messages survive the split.
pub struct ZoneGroup {
    members: Vec<Rank>,
    local_rank: usize,
    colour: u32,
    mailboxes: Arc<MailboxHub>,
    vote_gather: Arc<Collective<i32>>,
    barrier: Arc<Collective<()>>,
}

impl ZoneGroup {
    pub(crate) fn new(members: Vec<Rank>, local_rank: usize, colour: u32, mailboxes: Arc<MailboxHub>) -> Self {
        let size = members.len();
        Self {
            members,
            local_rank,
            colour,
            mailboxes,
            vote_gather: Collective::new(size),
            barrier: Collective::new(size),
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn local_rank(&self) -> usize {
        self.local_rank
    }

    pub fn global_rank(&self) -> Rank {
        self.members[self.local_rank]
    }

    pub fn colour(&self) -> u32 {
        self.colour
    }

    pub fn members(&self) -> &[Rank] {
        &self.members
    }

    /// Non-blocking send to every other zone peer (spec.md §4.8).
    pub fn broadcast_to_others(&self, payload: astp_core::Transaction) -> Result<(), crate::error::FabricError> {
        let me = self.global_rank();
        for &peer in &self.members {
            if peer == me {
                continue;
            }
            self.mailboxes.send(peer, Envelope { from: me, tag: 0, payload: payload.clone() })?;
        }
        Ok(())
    }

    pub async fn probe(&self) -> bool {
        self.mailboxes.probe(self.global_rank()).await
    }

    pub async fn try_receive(&self) -> Option<Envelope> {
        self.mailboxes.try_receive(self.global_rank()).await
    }

    /// All-gather of BFT votes within the zone (spec.md §4.6).
    pub async fn all_gather_votes(&self, vote: i32) -> Vec<i32> {
        self.vote_gather.all_gather(self.local_rank, vote).await
    }

    pub async fn barrier(&self) {
        self.barrier.barrier(self.local_rank).await;
    }
}
