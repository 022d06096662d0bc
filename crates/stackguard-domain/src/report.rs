use stackguard_types::{EnforcementLevel, StackguardData, Verdict, Violation};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub advisory: u32,
    pub mandatory: u32,
}

impl LevelCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = LevelCounts::default();
        for v in violations {
            match v.enforcement_level {
                EnforcementLevel::Advisory => {
                    counts.advisory = counts.advisory.saturating_add(1)
                }
                EnforcementLevel::Mandatory => {
                    counts.mandatory = counts.mandatory.saturating_add(1)
                }
                EnforcementLevel::Disabled => {}
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
    pub data: StackguardData,
    pub counts: LevelCounts,
}

/// Run counters are `u32` on the wire; larger counts saturate.
pub fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Any mandatory violation blocks; advisory-only warns.
pub fn compute_verdict(violations: &[Violation]) -> Verdict {
    let level = violations.iter().map(|v| v.enforcement_level).max();
    match level {
        Some(EnforcementLevel::Mandatory) => Verdict::Fail,
        Some(EnforcementLevel::Advisory) => Verdict::Warn,
        Some(EnforcementLevel::Disabled) | None => Verdict::Pass,
    }
}
