use astp_fabric::ZoneGroup;

/// Quorum-vote BFT over an all-gather on the zone group (spec.md §4.6).
/// Zones of size <= 2 skip the collective entirely and return the local
/// vote — the critical contract every caller must honour is that this
/// function is invoked by every zone member, in the same order, whenever
/// `zone.size() > 2`, or not at all.
pub async fn bft_consensus(zone: &ZoneGroup, my_vote: bool, quorum: f64) -> bool {
    let zone_size = zone.size();
    if zone_size <= 2 {
        return my_vote;
    }

    let votes = zone.all_gather_votes(my_vote as i32).await;
    let accepts = votes.iter().filter(|&&v| v == 1).count();
    (accepts as f64 / zone_size as f64) >= quorum
}
