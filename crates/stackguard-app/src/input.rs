//! Resource descriptor input: a JSON array or a JSON Lines stream.

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use stackguard_domain::model::{ResourceDescriptor, ResourceOp, ResourceType};
use stackguard_types::ResourceUrn;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(default)]
    urn: Option<String>,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    op: RawOp,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawOp {
    #[default]
    Create,
    Update,
}

/// Parse descriptors, keeping stream order.
///
/// Input starting with `[` is read as one JSON array; anything else as JSON Lines (blank lines
/// are skipped). A descriptor without a URN gets `urn:stackguard::<type>::<name>#<index>`, or
/// `urn:stackguard::<type>::<index>` when it has no name, where the index is the zero-based
/// stream position. The index keeps same-named descriptors of one type distinct.
pub fn parse_descriptors(text: &str) -> anyhow::Result<Vec<ResourceDescriptor>> {
    let trimmed = text.trim_start();
    let raw: Vec<RawDescriptor> = if trimmed.is_empty() {
        Vec::new()
    } else if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).context("parse descriptor array")?
    } else {
        let mut out = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawDescriptor = serde_json::from_str(line)
                .with_context(|| format!("parse descriptor on line {}", idx + 1))?;
            out.push(raw);
        }
        out
    };

    raw.into_iter()
        .enumerate()
        .map(|(idx, raw)| into_descriptor(idx, raw))
        .collect()
}

fn into_descriptor(idx: usize, raw: RawDescriptor) -> anyhow::Result<ResourceDescriptor> {
    let token = raw.resource_type.trim();
    if token.is_empty() {
        anyhow::bail!("descriptor #{idx} has an empty type");
    }

    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let urn = match raw.urn.as_deref().map(str::trim) {
        Some(urn) if !urn.is_empty() => ResourceUrn::new(urn),
        _ => {
            let segment = match name.as_deref() {
                Some(name) => format!("{name}#{idx}"),
                None => idx.to_string(),
            };
            ResourceUrn::synthesize(token, &segment)
        }
    };

    Ok(ResourceDescriptor {
        urn,
        resource_type: ResourceType::parse(token),
        name,
        op: match raw.op {
            RawOp::Create => ResourceOp::Create,
            RawOp::Update => ResourceOp::Update,
        },
        properties: raw.properties,
    })
}
