//! Violation sinks: decide whether a deployment may proceed.

use stackguard_types::{EnforcementLevel, Violation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Block,
}

/// Receives violations in evaluation order.
pub trait ViolationReporter {
    fn report(&mut self, violation: &Violation);

    /// Outcome after every violation has been reported.
    fn decision(&self) -> Decision;
}

/// Logs advisory violations as warnings and mandatory ones as errors; blocks on any mandatory.
#[derive(Clone, Debug, Default)]
pub struct LoggingReporter {
    advisory: u32,
    mandatory: u32,
}

impl LoggingReporter {
    pub fn advisory(&self) -> u32 {
        self.advisory
    }

    pub fn mandatory(&self) -> u32 {
        self.mandatory
    }
}

impl ViolationReporter for LoggingReporter {
    fn report(&mut self, violation: &Violation) {
        let urn = violation.urn.as_ref().map(|u| u.as_str()).unwrap_or("-");
        match violation.enforcement_level {
            EnforcementLevel::Advisory => {
                self.advisory += 1;
                tracing::warn!(
                    policy = %violation.policy_name,
                    code = %violation.code,
                    urn,
                    "advisory: {}",
                    violation.message
                );
            }
            EnforcementLevel::Mandatory => {
                self.mandatory += 1;
                tracing::error!(
                    policy = %violation.policy_name,
                    code = %violation.code,
                    urn,
                    "mandatory: {}",
                    violation.message
                );
            }
            EnforcementLevel::Disabled => {}
        }
    }

    fn decision(&self) -> Decision {
        if self.mandatory > 0 {
            Decision::Block
        } else {
            Decision::Proceed
        }
    }
}

pub fn report_violations<R: ViolationReporter + ?Sized>(
    reporter: &mut R,
    violations: &[Violation],
) -> Decision {
    for v in violations {
        reporter.report(v);
    }
    reporter.decision()
}
