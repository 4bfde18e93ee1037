use crate::error::ZoneError;
use crate::kmeans;
use astp_core::Rank;
use astp_fabric::{Fabric, GlobalGroup, ZoneGroup};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Run one round of zone formation end to end (spec.md §4.1): all-gather
/// this participant's similarity row into the full matrix, seed and cluster
/// identically everywhere given the same `seed`, split the global group by
/// the resulting colour, then barrier so no next-phase traffic starts
/// before every participant holds its new zone group.
///
/// `seed` must be the same value at every participant for a given
/// formation round (the driver derives it from the rebalance counter, not
/// from wall time, so every rank computes it independently and agrees).
pub async fn form_zones(
    fabric: &Fabric,
    rank: Rank,
    global: &GlobalGroup,
    row: Vec<f64>,
    k: usize,
    seed: u64,
) -> Result<(Vec<u32>, ZoneGroup), ZoneError> {
    let n = global.size();
    if k == 0 || k > n {
        return Err(ZoneError::TooFewParticipants { k, n });
    }

    let similarity = global.all_gather_rows(row).await;
    let mut rng = StdRng::seed_from_u64(seed);
    let seed_indices = kmeans::seed(&similarity, k, &mut rng);
    let assignment = kmeans::assign(&similarity, &seed_indices);
    let colours: Vec<u32> = assignment.into_iter().map(|c| c as u32).collect();

    let zone_group = fabric.split(rank, &colours)?;
    global.barrier().await;

    Ok((colours, zone_group))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_participant_reaches_the_same_assignment() {
        let n = 4;
        let fabric = Fabric::new(n);
        let latencies = vec![
            vec![0.0, 10.0, 250.0, 260.0],
            vec![10.0, 0.0, 240.0, 255.0],
            vec![250.0, 240.0, 0.0, 12.0],
            vec![260.0, 255.0, 12.0, 0.0],
        ];

        let mut handles = Vec::new();
        for rank in 0..n {
            let fabric = fabric.clone();
            let global = fabric.global_group(rank);
            let row: Vec<f64> = latencies[rank]
                .iter()
                .map(|&lat| 1.0 - (lat / 300.0).clamp(0.0, 1.0))
                .collect();
            handles.push(tokio::spawn(async move {
                form_zones(&fabric, rank, &global, row, 2, 99).await.map(|(colours, _group)| colours)
            }));
        }

        let mut results = Vec::new();
        for h in handles {
            results.push(h.await.unwrap().unwrap());
        }
        for other in &results[1..] {
            assert_eq!(&results[0], other);
        }
        // Ranks 0/1 are mutually close, 2/3 are mutually close, and the two
        // pairs are far apart, so they must not land in the same colour.
        assert_eq!(results[0][0], results[0][1]);
        assert_eq!(results[0][2], results[0][3]);
        assert_ne!(results[0][0], results[0][2]);
    }

    #[tokio::test]
    async fn rejects_a_k_larger_than_the_participant_count() {
        let fabric = Fabric::new(2);
        let global = fabric.global_group(0);
        let err = form_zones(&fabric, 0, &global, vec![0.0, 0.5], 5, 1).await.unwrap_err();
        assert!(matches!(err, ZoneError::TooFewParticipants { k: 5, n: 2 }));
    }
}
