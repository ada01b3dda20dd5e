//! Process-wide counters for the reconciliation session.

use serde::Serialize;

/// Counters for the session's lifetime. Monotonically non-decreasing until an
/// explicit [`reset`](StatsAggregator::reset). Only the search pipeline and
/// the reconciliation flow mutate them; everyone else reads snapshots.
///
/// Invariant: `accepted <= with_cost <= reviewed`.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    reviewed: u64,
    with_cost: u64,
    accepted: u64,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly once per top-level search call, before any attempt runs.
    pub(crate) fn record_reviewed(&mut self) {
        self.reviewed += 1;
    }

    /// Cost present and equal to the expected cost. Counted at reconciliation
    /// time; a later acceptance failure does not roll this back.
    pub(crate) fn record_match(&mut self) {
        self.with_cost += 1;
        self.accepted += 1;
    }

    /// Cost present but different from the expected cost.
    pub(crate) fn record_mismatch(&mut self) {
        self.with_cost += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_revisados: self.reviewed,
            total_con_costo: self.with_cost,
            total_aceptados: self.accepted,
        }
    }
}

/// Read-only view of the counters, embedded in every outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    #[serde(rename = "totalRevisados")]
    pub total_revisados: u64,
    #[serde(rename = "totalConCosto")]
    pub total_con_costo: u64,
    #[serde(rename = "totalAceptados")]
    pub total_aceptados: u64,
}

impl StatsSnapshot {
    /// `accepted <= with_cost <= reviewed`.
    pub fn invariant_holds(&self) -> bool {
        self.total_aceptados <= self.total_con_costo && self.total_con_costo <= self.total_revisados
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_outcomes() {
        let mut stats = StatsAggregator::new();
        stats.record_reviewed();
        stats.record_match();
        stats.record_reviewed();
        stats.record_mismatch();
        stats.record_reviewed();

        let snap = stats.snapshot();
        assert_eq!(snap.total_revisados, 3);
        assert_eq!(snap.total_con_costo, 2);
        assert_eq!(snap.total_aceptados, 1);
        assert!(snap.invariant_holds());
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut stats = StatsAggregator::new();
        stats.record_reviewed();
        stats.record_match();
        stats.reset();

        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}
