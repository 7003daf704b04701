use crate::types::report::ReadinessReport;

pub fn to_json(report: &ReadinessReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
