use rand::Rng;

/// Avalanche-style repeated sampling (spec.md §4.4). `zone_size < sample_size`
/// auto-accepts; otherwise the caller's `validate` predicate stands in for a
/// real per-peer query — every sampled vote in a round reads the same
/// predicate, a simulator simplification carried verbatim from the original
/// (spec.md §9 "Open questions").
pub fn fast_voting_consensus(
    zone_size: usize,
    validate: impl Fn() -> bool,
    rng: &mut impl Rng,
    sample_size: usize,
    quorum: usize,
    consecutive_rounds: u32,
    round_budget: u32,
) -> bool {
    if zone_size < sample_size {
        return true;
    }

    let mut preference: Option<bool> = None;
    let mut consecutive = 0u32;

    for _ in 0..round_budget {
        let mut accepts = 0usize;
        let mut rejects = 0usize;
        for _ in 0..sample_size {
            let _sampled_peer = rng.gen_range(0..zone_size);
            if validate() {
                accepts += 1;
            } else {
                rejects += 1;
            }
        }

        let proposal = if accepts >= quorum {
            true
        } else if rejects >= quorum {
            false
        } else {
            consecutive = 0;
            continue;
        };

        if Some(proposal) == preference {
            consecutive += 1;
        } else {
            preference = Some(proposal);
            consecutive = 1;
        }

        if consecutive >= consecutive_rounds {
            return proposal;
        }
    }

    false
}
