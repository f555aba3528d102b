// Final ranking of trade candidates.

use crate::matcher::{compare_candidates, TradeCandidate};

/// Number of recommendations kept when no limit is configured.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 12;

/// Sort candidates best first and keep at most `limit`.
pub fn rank(mut candidates: Vec<TradeCandidate>, limit: usize) -> Vec<TradeCandidate> {
    candidates.sort_by(compare_candidates);
    candidates.truncate(limit);
    candidates
}
