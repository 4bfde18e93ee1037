use rand::Rng;

const EPSILON: f64 = 1e-6;
const MASS_FLOOR: f64 = 1e-10;
const MAX_ITERATIONS: usize = 100;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// k-means++ seeding over a similarity matrix (spec.md §4.1). `rng` must be
/// seeded identically across every participant (the caller's job) so that,
/// given the same all-gathered `similarity`, every participant draws the
/// same seed indices without any shared memory.
pub fn seed(similarity: &[Vec<f64>], k: usize, rng: &mut impl Rng) -> Vec<usize> {
    let n = similarity.len();
    let max_s = similarity.iter().flatten().copied().fold(f64::MIN, f64::max);
    let pseudo_distance = |x: usize, c: usize| max_s - similarity[x][c] + EPSILON;

    let mut chosen = Vec::with_capacity(k);
    chosen.push(rng.gen_range(0..n));

    while chosen.len() < k {
        let mut weights = vec![0.0f64; n];
        let mut mass = 0.0;
        for x in 0..n {
            if chosen.contains(&x) {
                continue;
            }
            let min_sq = chosen
                .iter()
                .map(|&c| {
                    let d = pseudo_distance(x, c);
                    d * d
                })
                .fold(f64::INFINITY, f64::min);
            weights[x] = min_sq;
            mass += min_sq;
        }

        let next = if mass < MASS_FLOOR {
            // Deterministic uniform pick (spec.md §4.1): no RNG draw, so the
            // fallback needs no shared state beyond the chosen set itself.
            (0..n).find(|x| !chosen.contains(x)).expect("fewer than k distinct points remain")
        } else {
            let target = rng.gen::<f64>() * mass;
            let mut cumulative = 0.0;
            let mut picked = None;
            for x in 0..n {
                if chosen.contains(&x) {
                    continue;
                }
                cumulative += weights[x];
                if cumulative >= target {
                    picked = Some(x);
                    break;
                }
            }
            picked.unwrap_or_else(|| (0..n).rev().find(|x| !chosen.contains(x)).expect("fewer than k distinct points remain"))
        };
        chosen.push(next);
    }

    chosen
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

/// Lloyd's iteration over similarity rows as feature vectors (spec.md
/// §4.1). Ties in assignment break toward the lowest centroid index since
/// the scan keeps the first strictly-smaller distance found.
pub fn assign(similarity: &[Vec<f64>], seed_indices: &[usize]) -> Vec<usize> {
    let n = similarity.len();
    let k = seed_indices.len();
    let mut centroids: Vec<Vec<f64>> = seed_indices.iter().map(|&i| similarity[i].clone()).collect();
    let mut assignment = vec![0usize; n];

    for _ in 0..MAX_ITERATIONS {
        for x in 0..n {
            let mut best_cluster = 0;
            let mut best_distance = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let distance = euclidean(&similarity[x], centroid);
                if distance < best_distance {
                    best_distance = distance;
                    best_cluster = c;
                }
            }
            assignment[x] = best_cluster;
        }

        let dims = similarity[0].len();
        let mut sums = vec![vec![0.0f64; dims]; k];
        let mut counts = vec![0usize; k];
        for x in 0..n {
            let c = assignment[x];
            for d in 0..dims {
                sums[c][d] += similarity[x][d];
            }
            counts[c] += 1;
        }

        let mut max_move = 0.0f64;
        for c in 0..k {
            if counts[c] == 0 {
                // An empty cluster keeps its previous centroid rather than
                // becoming NaN; it simply attracts no points this round.
                continue;
            }
            let updated: Vec<f64> = sums[c].iter().map(|&s| s / counts[c] as f64).collect();
            max_move = max_move.max(euclidean(&centroids[c], &updated));
            centroids[c] = updated;
        }

        if max_move < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn four_corner_clusters() -> Vec<Vec<f64>> {
        // 8 points, two per corner of a unit-ish square, expressed as
        // similarity to 4 landmark columns so Euclidean distance in
        // similarity-space separates the four corners cleanly.
        let corners: [[f64; 4]; 4] = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let mut rows = Vec::new();
        for corner in corners {
            rows.push(corner.to_vec());
            let jittered: Vec<f64> = corner.iter().map(|&v| if v > 0.5 { v - 0.01 } else { v + 0.0025 }).collect();
            rows.push(jittered);
        }
        rows
    }

    #[test]
    fn seeding_and_assignment_recover_four_well_separated_clusters() {
        let similarity = four_corner_clusters();
        let mut rng = StdRng::seed_from_u64(42);
        let seeds = seed(&similarity, 4, &mut rng);
        assert_eq!(seeds.len(), 4);

        let assignment = assign(&similarity, &seeds);
        // Each adjacent pair (0,1), (2,3), (4,5), (6,7) was built from the
        // same corner and must land in the same cluster.
        for pair in [(0, 1), (2, 3), (4, 5), (6, 7)] {
            assert_eq!(assignment[pair.0], assignment[pair.1]);
        }
        let distinct: std::collections::HashSet<_> = assignment.iter().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn same_seed_and_matrix_always_yields_the_same_assignment() {
        let similarity = four_corner_clusters();
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let assignment_a = assign(&similarity, &seed(&similarity, 4, &mut rng_a));
        let assignment_b = assign(&similarity, &seed(&similarity, 4, &mut rng_b));
        assert_eq!(assignment_a, assignment_b);
    }

    #[test]
    fn degenerate_matrix_falls_back_to_deterministic_uniform_pick() {
        // Every entry identical collapses all pseudo-distances to the same
        // value, so after the first centroid is chosen the remaining mass
        // only vanishes if all points are literally indistinguishable.
        let similarity = vec![vec![0.5; 3]; 3];
        let mut rng = StdRng::seed_from_u64(1);
        let seeds = seed(&similarity, 3, &mut rng);
        assert_eq!(seeds.len(), 3);
        let distinct: std::collections::HashSet<_> = seeds.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn assignment_breaks_ties_toward_the_lowest_centroid_index() {
        // Point exactly equidistant from both centroids.
        let similarity = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let assignment = assign(&similarity, &[1, 2]);
        assert_eq!(assignment[0], 0);
    }

    proptest::proptest! {
        /// spec.md §8: "Re-running zone formation with unchanged similarities
        /// and the same seed yields the same assignment" — and every
        /// assigned colour stays within `[0, k)`.
        #[test]
        fn same_matrix_and_seed_is_deterministic(
            raw in proptest::collection::vec(proptest::collection::vec(0.0f64..1.0, 6), 6),
            seed_value in 0u64..10_000,
            k in 2usize..4,
        ) {
            let similarity: Vec<Vec<f64>> = raw.iter().map(|row| row.clone()).collect();

            let mut rng_a = StdRng::seed_from_u64(seed_value);
            let assignment_a = assign(&similarity, &seed(&similarity, k, &mut rng_a));

            let mut rng_b = StdRng::seed_from_u64(seed_value);
            let assignment_b = assign(&similarity, &seed(&similarity, k, &mut rng_b));

            proptest::prop_assert_eq!(&assignment_a, &assignment_b);
            proptest::prop_assert!(assignment_a.iter().all(|&c| c < k));
        }
    }
}
