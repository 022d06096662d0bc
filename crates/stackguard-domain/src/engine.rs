use crate::fingerprint::fingerprint_for_violation;
use crate::model::ResourceDescriptor;
use crate::policy::{Finding, PackEntry, PolicyPack, PredicateFault};
use crate::report::{compute_verdict, saturating_count, DomainReport, LevelCounts};
use rayon::prelude::*;
use stackguard_types::{StackguardData, Violation};

/// Evaluate every descriptor against the pack.
///
/// Descriptors are independent, so they are evaluated in parallel; the result keeps input
/// order (descriptor, then pack order, then emission order). The first predicate fault aborts
/// the run.
pub fn evaluate(
    pack: &PolicyPack,
    resources: &[ResourceDescriptor],
) -> Result<DomainReport, PredicateFault> {
    let per_resource: Vec<Vec<Violation>> = resources
        .par_iter()
        .map(|resource| evaluate_resource(pack, resource))
        .collect::<Result<_, _>>()?;

    let violations: Vec<Violation> = per_resource.into_iter().flatten().collect();

    let verdict = compute_verdict(&violations);
    let counts = LevelCounts::from_violations(&violations);

    let data = StackguardData {
        pack: pack.name().to_string(),
        pack_version: pack.version().to_string(),
        taxonomy_version: pack.taxonomy_version(),
        resources_scanned: saturating_count(resources.len()),
        policies_enabled: saturating_count(pack.enabled().count()),
        violations_total: saturating_count(violations.len()),
    };

    Ok(DomainReport {
        verdict,
        violations,
        data,
        counts,
    })
}

/// Evaluate one descriptor against every applicable policy of the pack.
pub fn evaluate_resource(
    pack: &PolicyPack,
    resource: &ResourceDescriptor,
) -> Result<Vec<Violation>, PredicateFault> {
    let mut violations = Vec::new();

    for entry in pack.enabled() {
        if !entry
            .policy()
            .filter()
            .matches(&resource.resource_type, pack.taxonomy())
        {
            continue;
        }
        if entry.is_exempt(resource) {
            continue;
        }

        let mut findings = Vec::new();
        entry.policy().evaluate(resource, &mut findings)?;

        violations.extend(
            findings
                .into_iter()
                .map(|finding| to_violation(entry, resource, finding)),
        );
    }

    Ok(violations)
}

fn to_violation(entry: &PackEntry, resource: &ResourceDescriptor, finding: Finding) -> Violation {
    let fingerprint = fingerprint_for_violation(
        entry.name(),
        finding.code,
        resource.urn.as_str(),
        &finding.subject,
    );
    Violation {
        policy_name: entry.name().to_string(),
        enforcement_level: entry.level(),
        code: finding.code.to_string(),
        message: finding.message,
        urn: Some(resource.urn.clone()),
        resource_type: Some(resource.resource_type.as_str().to_string()),
        help: finding.help,
        fingerprint: Some(fingerprint),
        data: finding.data,
    }
}
