use crate::model::{ResourceDescriptor, ResourceType};
use crate::schema::{ConfigSchema, ValidatedConfig};
use crate::taxonomy::{Capability, Taxonomy, TAXONOMY_VERSION};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use stackguard_types::EnforcementLevel;
use std::collections::BTreeSet;
use std::fmt;

/// What a predicate emits. The engine attaches policy name, enforcement level and resource
/// identity to turn it into a `Violation`.
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    pub code: &'static str,
    pub message: String,
    /// The thing that failed (tag key, property name). Part of the fingerprint.
    pub subject: String,
    pub help: Option<String>,
    pub data: Value,
}

/// Which descriptors a policy wants to see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceFilter {
    Any,
    Type(ResourceType),
    Capability(Capability),
}

impl ResourceFilter {
    pub fn of_type(token: &str) -> Self {
        ResourceFilter::Type(ResourceType::parse(token))
    }

    pub fn matches(&self, resource_type: &ResourceType, taxonomy: &Taxonomy) -> bool {
        match self {
            ResourceFilter::Any => true,
            ResourceFilter::Type(t) => t.same_kind(resource_type),
            ResourceFilter::Capability(c) => taxonomy.supports(resource_type, *c),
        }
    }
}

impl fmt::Display for ResourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceFilter::Any => f.write_str("any"),
            ResourceFilter::Type(t) => write!(f, "type {t}"),
            ResourceFilter::Capability(c) => write!(f, "capability {}", c.as_str()),
        }
    }
}

/// A predicate failed in a way that is not a violation: a logic or configuration defect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("policy '{policy}' faulted on {urn}: {message}")]
pub struct PredicateFault {
    pub policy: String,
    pub urn: String,
    pub message: String,
}

/// One pluggable validation unit.
///
/// Implementations hold their own typed configuration and must be pure: the same descriptor
/// always yields the same findings, and nothing is remembered between calls.
pub trait Policy: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn filter(&self) -> ResourceFilter {
        ResourceFilter::Any
    }

    fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        out: &mut Vec<Finding>,
    ) -> Result<(), PredicateFault>;
}

/// Static registration data for a built-in policy.
pub struct PolicyDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub default_level: EnforcementLevel,
    pub schema: fn() -> ConfigSchema,
    pub build: fn(&ValidatedConfig) -> Box<dyn Policy>,
}

impl fmt::Debug for PolicyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyDefinition")
            .field("name", &self.name)
            .field("default_level", &self.default_level)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("duplicate policy name in pack: {0}")]
    DuplicatePolicy(String),
    #[error("invalid allow pattern for {policy}: {source}")]
    InvalidAllow {
        policy: String,
        #[source]
        source: globset::Error,
    },
}

/// A policy bound to its enforcement level and exemptions.
#[derive(Debug)]
pub struct PackEntry {
    policy: Box<dyn Policy>,
    level: EnforcementLevel,
    allow: Vec<String>,
    exemptions: Option<GlobSet>,
}

impl PackEntry {
    pub fn policy(&self) -> &dyn Policy {
        self.policy.as_ref()
    }

    pub fn name(&self) -> &str {
        self.policy.name()
    }

    pub fn level(&self) -> EnforcementLevel {
        self.level
    }

    pub fn allow(&self) -> &[String] {
        &self.allow
    }

    /// Allow patterns are matched against the full URN and the logical name.
    pub fn is_exempt(&self, resource: &ResourceDescriptor) -> bool {
        let Some(set) = &self.exemptions else {
            return false;
        };
        set.is_match(resource.urn.as_str()) || set.is_match(resource.display_name())
    }
}

/// An ordered, immutable set of uniquely named policies.
#[derive(Debug)]
pub struct PolicyPack {
    name: String,
    version: String,
    taxonomy: Taxonomy,
    entries: Vec<PackEntry>,
}

impl PolicyPack {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> PolicyPackBuilder {
        PolicyPackBuilder {
            name: name.into(),
            version: version.into(),
            taxonomy: Taxonomy::builtin(),
            entries: Vec::new(),
            names: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn taxonomy_version(&self) -> u32 {
        TAXONOMY_VERSION
    }

    /// All entries in insertion order, including disabled ones.
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    pub fn enabled(&self) -> impl Iterator<Item = &PackEntry> {
        self.entries.iter().filter(|e| e.level.is_enabled())
    }

    pub fn entry(&self, name: &str) -> Option<&PackEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }
}

#[derive(Debug)]
pub struct PolicyPackBuilder {
    name: String,
    version: String,
    taxonomy: Taxonomy,
    entries: Vec<PackEntry>,
    names: BTreeSet<String>,
}

impl PolicyPackBuilder {
    pub fn taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub fn policy(
        mut self,
        policy: Box<dyn Policy>,
        level: EnforcementLevel,
        allow: Vec<String>,
    ) -> Result<Self, PackError> {
        let name = policy.name().to_string();
        if !self.names.insert(name.clone()) {
            return Err(PackError::DuplicatePolicy(name));
        }
        let exemptions = build_exemptions(&name, &allow)?;
        self.entries.push(PackEntry {
            policy,
            level,
            allow,
            exemptions,
        });
        Ok(self)
    }

    pub fn build(self) -> PolicyPack {
        PolicyPack {
            name: self.name,
            version: self.version,
            taxonomy: self.taxonomy,
            entries: self.entries,
        }
    }
}

fn build_exemptions(policy: &str, allow: &[String]) -> Result<Option<GlobSet>, PackError> {
    if allow.is_empty() {
        return Ok(None);
    }
    let invalid = |source| PackError::InvalidAllow {
        policy: policy.to_string(),
        source,
    };
    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        builder.add(Glob::new(pattern).map_err(invalid)?);
    }
    builder.build().map(Some).map_err(invalid)
}
