//! Payloads of the two mutation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::model::alert::Alert;

/// Body of `POST /alerts/trigger`. Every field is optional; the server fills
/// in demo defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAlertRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAlertResponse {
    pub success: bool,
    pub alert: Alert,
    pub message: String,
    pub actions: Vec<String>,
}

/// Body of `POST /workflows/discharge-summary/trigger`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDischargeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStepStatus {
    Completed,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: u32,
    pub name: String,
    pub status: WorkflowStepStatus,
    /// `null` until the step has started.
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestions {
    pub primary_diagnosis: String,
    pub secondary_diagnoses: Vec<String>,
    pub procedures: Vec<String>,
    pub medications: Vec<String>,
}

/// A fabricated discharge summary workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeWorkflow {
    pub id: String,
    pub patient_id: String,
    pub status: String,
    pub steps: Vec<WorkflowStep>,
    pub estimated_completion: DateTime<Utc>,
    pub ai_suggestions: AiSuggestions,
}

impl Entity for DischargeWorkflow {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedSavings {
    pub time: String,
    pub accuracy: String,
    pub compliance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDischargeResponse {
    pub success: bool,
    pub workflow: DischargeWorkflow,
    pub message: String,
    pub estimated_savings: EstimatedSavings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_request_accepts_empty_object_and_camel_case() {
        let empty: TriggerAlertRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TriggerAlertRequest::default());

        let req: TriggerAlertRequest =
            serde_json::from_str(r#"{"patientId":"PAT-1","unit":"ICU"}"#).unwrap();
        assert_eq!(req.patient_id.as_deref(), Some("PAT-1"));
        assert_eq!(req.unit.as_deref(), Some("ICU"));
    }

    #[test]
    fn pending_steps_serialize_null_timestamp() {
        let step = WorkflowStep {
            id: 3,
            name: "ICD Code Suggestion".into(),
            status: WorkflowStepStatus::Pending,
            timestamp: None,
            description: "AI-powered ICD-10 code recommendations".into(),
        };
        let v = serde_json::to_value(step).unwrap();
        assert!(v["timestamp"].is_null());
        assert_eq!(v["status"], "pending");

        let in_progress = serde_json::to_value(WorkflowStepStatus::InProgress).unwrap();
        assert_eq!(in_progress, "in-progress");
    }
}
