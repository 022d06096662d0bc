//! Static capability table for resource types.
//!
//! Membership is explicit: a type that is not listed does not have the capability, even if
//! its provider schema would accept it. Extend the table deliberately (either here, bumping
//! `TAXONOMY_VERSION`, or per organization through `Taxonomy::extend`).

use crate::model::ResourceType;
use std::collections::BTreeMap;

/// Bumped whenever the built-in tables change.
pub const TAXONOMY_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// The type accepts a `tags` key/value mapping.
    Tags,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Tags => "tags",
        }
    }
}

const TAGGABLE: &[&str] = &[
    "aws:cloudwatch/logGroup:LogGroup",
    "aws:dynamodb/table:Table",
    "aws:ec2/instance:Instance",
    "aws:ec2/internetGateway:InternetGateway",
    "aws:ec2/routeTable:RouteTable",
    "aws:ec2/securityGroup:SecurityGroup",
    "aws:ec2/subnet:Subnet",
    "aws:ec2/vpc:Vpc",
    "aws:ecr/repository:Repository",
    "aws:ecs/cluster:Cluster",
    "aws:ecs/service:Service",
    "aws:efs/fileSystem:FileSystem",
    "aws:iam/policy:Policy",
    "aws:iam/role:Role",
    "aws:kms/key:Key",
    "aws:lambda/function:Function",
    "aws:lb/loadBalancer:LoadBalancer",
    "aws:lb/targetGroup:TargetGroup",
    "aws:rds/instance:Instance",
    "aws:s3/bucket:Bucket",
    "aws:secretsmanager/secret:Secret",
    "aws:sns/topic:Topic",
    "aws:sqs/queue:Queue",
];

fn builtin_table(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::Tags => TAGGABLE,
    }
}

/// Answer capability queries against the built-in table only.
pub fn supports_capability(resource_type: &str, capability: Capability) -> bool {
    Taxonomy::builtin().supports(&ResourceType::parse(resource_type), capability)
}

/// The built-in table plus any organization-specific additions.
#[derive(Clone, Debug)]
pub struct Taxonomy {
    entries: BTreeMap<Capability, Vec<ResourceType>>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Taxonomy {
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for capability in [Capability::Tags] {
            let types = builtin_table(capability)
                .iter()
                .map(|t| ResourceType::parse(t))
                .collect();
            entries.insert(capability, types);
        }
        Self { entries }
    }

    /// Additive only: built-in entries can never be removed.
    pub fn extend<I, S>(&mut self, capability: Capability, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.entries.entry(capability).or_default();
        for token in tokens {
            let ty = ResourceType::parse(token.as_ref());
            if !list.iter().any(|known| known.as_str() == ty.as_str()) {
                list.push(ty);
            }
        }
    }

    pub fn supports(&self, resource_type: &ResourceType, capability: Capability) -> bool {
        self.entries
            .get(&capability)
            .is_some_and(|types| types.iter().any(|t| t.same_kind(resource_type)))
    }

    pub fn len(&self, capability: Capability) -> usize {
        self.entries.get(&capability).map_or(0, Vec::len)
    }
}
