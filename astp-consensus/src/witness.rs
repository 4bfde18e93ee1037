/// Cross-zone witness validation (SPEC_FULL.md §4.9, grounded on
/// `original_source/src/witnesses.c`). Reserved for an optional
/// cross-zone-validation extension — the mandatory selector (`selector.rs`)
/// never dispatches to this on its own.
///
/// Carried verbatim from the original's simulator simplification: it does
/// not actually query any witness, it only checks that at least one witness
/// exists and that unanimous witness acceptance would clear the threshold.
/// A real implementation would send the tx to each witness, collect their
/// votes in both zones, and check the threshold against the real tally.
pub fn witness_validate(witness_count: usize, threshold: f64) -> bool {
    if witness_count == 0 {
        return false;
    }
    let confidence = witness_count as f64 / witness_count as f64;
    confidence >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_witnesses_is_rejected() {
        assert!(!witness_validate(0, 0.67));
    }

    #[test]
    fn any_witnesses_clear_the_default_threshold() {
        assert!(witness_validate(1, 0.67));
        assert!(witness_validate(5, 0.67));
    }

    #[test]
    fn threshold_above_one_can_never_be_met() {
        assert!(!witness_validate(3, 1.01));
    }
}
