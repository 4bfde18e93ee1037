use serde::{Deserialize, Serialize};

/// Load classification driving consensus selection (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Low,
    Normal,
    High,
}

impl Default for Phase {
    /// The reference implementation starts every node in `PHASE_NORMAL`.
    fn default() -> Self {
        Phase::Normal
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Low => "LOW",
            Phase::Normal => "NORMAL",
            Phase::High => "HIGH",
        };
        f.write_str(name)
    }
}
