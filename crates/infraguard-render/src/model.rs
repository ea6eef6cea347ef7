#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableLevel {
    Mandatory,
    Advisory,
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
    pub rule_name: String,
    pub code: String,
    pub message: String,
    /// Human label of the offending resource (urn, name or `#index`).
    pub resource: Option<String>,
    pub help: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub profile: String,
    pub pack: String,
    pub resources_scanned: u32,
    pub violations_total: u32,
    pub mandatory: u32,
    pub advisory: u32,
    pub faults: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub violations: Vec<RenderableViolation>,
    pub data: RenderableData,
}
