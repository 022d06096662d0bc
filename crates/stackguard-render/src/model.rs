#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableLevel {
    Advisory,
    Mandatory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub level: RenderableLevel,
    pub policy_name: String,
    pub code: String,
    pub message: String,
    pub urn: Option<String>,
    pub resource_type: Option<String>,
    pub help: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub pack: String,
    pub resources_scanned: u32,
    pub violations_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub violations: Vec<RenderableViolation>,
    pub data: RenderableData,
}
