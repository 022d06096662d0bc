//! Stable identifiers for policies and violation codes.
//!
//! Policy names are kebab-case and unique within a pack. `code` is a short snake_case
//! discriminator.

// Policies
pub const POLICY_REQUIRED_TAGS: &str = "required-tags";
pub const POLICY_MAX_CPU: &str = "max-cpu";

// Codes: required-tags
pub const CODE_MISSING_TAG: &str = "missing_tag";
pub const CODE_INVALID_TAGS: &str = "invalid_tags";

// Codes: max-cpu
pub const CODE_LIMIT_EXCEEDED: &str = "limit_exceeded";
pub const CODE_UNPARSABLE_VALUE: &str = "unparsable_value";

// Tool-level
pub const POLICY_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

// Reserved configuration keys
pub const CONFIG_KEY_ALL: &str = "all";
pub const CONFIG_KEY_TAXONOMY: &str = "taxonomy";
pub const CONFIG_KEY_ENFORCEMENT_LEVEL: &str = "enforcementLevel";
pub const CONFIG_KEY_ALLOW: &str = "allow";
