use serde_json::{Map, Value};
use stackguard_types::ResourceUrn;

/// Snapshot of one resource about to be created or updated.
#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    pub urn: ResourceUrn,
    pub resource_type: ResourceType,
    /// Logical name, when the host supplies one.
    pub name: Option<String>,
    pub op: ResourceOp,
    pub properties: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResourceOp {
    #[default]
    Create,
    Update,
}

impl ResourceDescriptor {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Logical name, falling back to the last URN segment.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.urn.name())
    }
}

/// A namespaced resource type token.
///
/// Accepted shapes:
/// - `aws:ecs/cluster:Cluster` (provider, module path, kind)
/// - `aws:ecs:Cluster`
/// - `ecs:Cluster` (provider omitted)
///
/// Anything else is kept verbatim and only ever equals the identical token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceType {
    token: String,
    provider: Option<String>,
    module: Option<String>,
    /// Full `module/sub` path, only when the token carries one.
    module_path: Option<String>,
    kind: String,
}

impl ResourceType {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let parts: Vec<&str> = token.split(':').collect();
        let (provider, module, kind) = match parts.as_slice() {
            [provider, module, kind] if !kind.is_empty() => (Some(*provider), Some(*module), *kind),
            [module, kind] if !kind.is_empty() => (None, Some(*module), *kind),
            _ => (None, None, token),
        };
        let module = module.filter(|m| !m.is_empty());
        Self {
            token: token.to_string(),
            provider: provider.filter(|p| !p.is_empty()).map(str::to_string),
            module: module
                .map(module_name)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            module_path: module.filter(|m| m.contains('/')).map(str::to_string),
            kind: kind.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether both tokens name the same kind of resource. An omitted provider matches any
    /// provider, and an omitted module sub-path matches any sub-path of the same module. When
    /// both tokens carry a sub-path, the full paths must agree. An unparsed token only matches
    /// itself.
    pub fn same_kind(&self, other: &ResourceType) -> bool {
        if self.module.is_none() || other.module.is_none() {
            return self.token == other.token;
        }
        let providers_agree = match (&self.provider, &other.provider) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        let paths_agree = match (&self.module_path, &other.module_path) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        providers_agree && paths_agree && self.module == other.module && self.kind == other.kind
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token)
    }
}

// `ecs/cluster` -> `ecs`
fn module_name(segment: &str) -> &str {
    segment.split('/').next().unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_token() {
        let t = ResourceType::parse("aws:ecs/taskDefinition:TaskDefinition");
        assert_eq!(t.provider(), Some("aws"));
        assert_eq!(t.module(), Some("ecs"));
        assert_eq!(t.module_path(), Some("ecs/taskDefinition"));
        assert_eq!(t.kind(), "TaskDefinition");
        assert_eq!(ResourceType::parse("ecs:TaskDefinition").module_path(), None);
    }

    #[test]
    fn short_and_full_tokens_are_the_same_kind() {
        let full = ResourceType::parse("aws:ecs/cluster:Cluster");
        let short = ResourceType::parse("ecs:Cluster");
        assert!(full.same_kind(&short));
        assert!(short.same_kind(&full));
    }

    #[test]
    fn full_tokens_compare_the_whole_module_path() {
        let task = ResourceType::parse("aws:ecs/taskDefinition:TaskDefinition");
        assert!(!task.same_kind(&ResourceType::parse("aws:ecs/anything:TaskDefinition")));
        assert!(!ResourceType::parse("aws:ecs/anything:TaskDefinition").same_kind(&task));
        assert!(task.same_kind(&ResourceType::parse("aws:ecs/taskDefinition:TaskDefinition")));
    }

    #[test]
    fn tokens_without_a_sub_path_still_match_full_ones() {
        let task = ResourceType::parse("aws:ecs/taskDefinition:TaskDefinition");
        assert!(task.same_kind(&ResourceType::parse("ecs:TaskDefinition")));
        assert!(task.same_kind(&ResourceType::parse("aws:ecs:TaskDefinition")));
        assert!(ResourceType::parse("ecs:TaskDefinition").same_kind(&task));
        assert!(!task.same_kind(&ResourceType::parse("lambda:TaskDefinition")));
    }

    #[test]
    fn different_providers_are_different_kinds() {
        let aws = ResourceType::parse("aws:ecs/cluster:Cluster");
        let other = ResourceType::parse("acme:ecs/cluster:Cluster");
        assert!(!aws.same_kind(&other));
    }

    #[test]
    fn unparsed_tokens_compare_verbatim() {
        let a = ResourceType::parse("Cluster");
        assert_eq!(a.module(), None);
        assert!(a.same_kind(&ResourceType::parse("Cluster")));
        assert!(!a.same_kind(&ResourceType::parse("ecs:Cluster")));
    }
}
