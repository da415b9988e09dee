use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Monitor,
    Explorer,
    Coordinator,
    Synthesizer,
    Archivist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// KPI values are either numeric or free text ("18 identified").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for KpiValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub value: KpiValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// A display entity describing one automated capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub domain: String,
    pub status: AgentStatus,
    pub description: String,
    pub purpose: String,
    pub kpis: Vec<Kpi>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub rules: Vec<String>,
    pub dashboards: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, String>>,
}

impl Entity for Agent {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub patient: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfiguration {
    pub alert_thresholds: BTreeMap<String, String>,
    pub escalation_rules: BTreeMap<String, String>,
}

/// Agent record plus the extras shown on the agent detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    #[serde(flatten)]
    pub agent: Agent,
    #[serde(default)]
    pub recent_actions: Vec<RecentAction>,
    #[serde(default)]
    pub linked_processes: Vec<String>,
    #[serde(default)]
    pub configuration: AgentConfiguration,
    #[serde(default)]
    pub api_endpoints: Vec<String>,
}

impl AgentDetail {
    /// Detail record with no curated extras.
    pub fn bare(agent: Agent) -> Self {
        Self {
            agent,
            recent_actions: Vec::new(),
            linked_processes: Vec::new(),
            configuration: AgentConfiguration::default(),
            api_endpoints: Vec::new(),
        }
    }
}

impl Entity for AgentDetail {
    fn id(&self) -> &str {
        &self.agent.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Agent {
        Agent {
            id: "sentinel".into(),
            name: "Sentinel".into(),
            agent_type: AgentType::Monitor,
            domain: "Patient Safety".into(),
            status: AgentStatus::Active,
            description: "d".into(),
            purpose: "p".into(),
            kpis: vec![Kpi {
                id: "icu-accuracy".into(),
                name: "ICU Early Warning Accuracy".into(),
                value: "94".into(),
                unit: Some("%".into()),
                trend: Some(Trend::Up),
                target: Some(90.0),
            }],
            inputs: vec![],
            outputs: vec![],
            rules: vec![],
            dashboards: vec![],
            last_active: None,
            metrics: None,
        }
    }

    #[test]
    fn agent_serializes_type_field_and_camel_case() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["type"], "monitor");
        assert_eq!(v["status"], "active");
        assert!(v.get("lastActive").is_none());
        assert_eq!(v["kpis"][0]["value"], "94");
    }

    #[test]
    fn detail_flattens_agent_fields() {
        let detail = AgentDetail::bare(sample());
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["id"], "sentinel");
        assert_eq!(v["recentActions"].as_array().unwrap().len(), 0);
        assert!(v["configuration"]["alertThresholds"].is_object());

        let back: AgentDetail = serde_json::from_value(v).unwrap();
        assert_eq!(back.id(), "sentinel");
    }

    #[test]
    fn kpi_value_accepts_numbers_and_text() {
        let n: KpiValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(n, KpiValue::Number(12.5));
        let t: KpiValue = serde_json::from_str("\"18 identified\"").unwrap();
        assert_eq!(t, KpiValue::Text("18 identified".into()));
    }
}
