use infraguard_types::{EnforcementLevel, Verdict, Violation, ids};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub mandatory: u32,
    pub advisory: u32,
}

impl LevelCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = LevelCounts::default();
        for v in violations {
            match v.enforcement_level {
                EnforcementLevel::Mandatory => counts.mandatory += 1,
                EnforcementLevel::Advisory => counts.advisory += 1,
            }
        }
        counts
    }
}

/// Counters describing how much work one pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub resources_scanned: u32,
    /// Resources with at least one applicable, enabled rule.
    pub resources_evaluated: u32,
    /// (resource, rule) pairs evaluated.
    pub rules_evaluated: u32,
    pub faults: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyReport {
    /// Resource order, then registry order, then emission order.
    pub violations: Vec<Violation>,
    pub counts: LevelCounts,
    pub stats: PassStats,
    pub verdict: Verdict,
}

impl PolicyReport {
    /// True iff any violation is mandatory.
    pub fn has_blocking_violations(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.enforcement_level.is_blocking())
    }

    pub fn faults(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.code == ids::CODE_RULE_FAULT)
    }
}
