use anyhow::Context;
use stackguard_types::{SCHEMA_REPORT_V1, StackguardReport};

pub fn parse_report_json(text: &str) -> anyhow::Result<StackguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse stackguard report")
}

pub fn serialize_report(report: &StackguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}
