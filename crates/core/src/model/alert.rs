use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(DomainError::validation(format!(
                "unknown alert type '{other}' (expected critical, high, medium or low)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub escalation_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_deadline: Option<DateTime<Utc>>,
}

impl Alert {
    /// Merge `patch` into this alert; absent fields are left untouched.
    pub fn apply(&mut self, patch: &AlertPatch) {
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(patient_id) = &patch.patient_id {
            self.patient_id = Some(patient_id.clone());
        }
        if let Some(patient_name) = &patch.patient_name {
            self.patient_name = Some(patient_name.clone());
        }
        if let Some(unit) = &patch.unit {
            self.unit = Some(unit.clone());
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to = Some(assigned_to.clone());
        }
        if let Some(level) = patch.escalation_level {
            self.escalation_level = level;
        }
        if let Some(deadline) = patch.sla_deadline {
            self.sla_deadline = Some(deadline);
        }
    }
}

impl Entity for Alert {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update for an [`Alert`]. The id is never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
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
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_deadline: Option<DateTime<Utc>>,
}

impl AlertPatch {
    pub fn status(status: AlertStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn alert() -> Alert {
        Alert {
            id: "1".into(),
            severity: AlertSeverity::Critical,
            title: "Critical Lab Result - Potassium".into(),
            description: "Patient 101: Potassium level 6.8 mEq/L (Critical: >6.5)".into(),
            patient_id: Some("PAT-101".into()),
            patient_name: None,
            unit: Some("ICU".into()),
            timestamp: Utc.with_ymd_and_hms(2024, 2, 5, 14, 30, 0).unwrap(),
            status: AlertStatus::Active,
            assigned_to: None,
            escalation_level: 1,
            sla_deadline: None,
        }
    }

    #[test]
    fn wire_shape_uses_type_and_camel_case() {
        let v = serde_json::to_value(alert()).unwrap();
        assert_eq!(v["type"], "critical");
        assert_eq!(v["patientId"], "PAT-101");
        assert_eq!(v["escalationLevel"], 1);
        assert!(v.get("patientName").is_none());
    }

    #[test]
    fn severity_parses_known_labels_only() {
        assert_eq!("high".parse::<AlertSeverity>().unwrap(), AlertSeverity::High);
        assert!(matches!(
            "urgent".parse::<AlertSeverity>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn patch_replaces_only_present_fields() {
        let mut a = alert();
        let moved_at = Utc.with_ymd_and_hms(2024, 2, 5, 15, 0, 0).unwrap();
        a.apply(&AlertPatch {
            status: Some(AlertStatus::Acknowledged),
            assigned_to: Some("Nurse Aisha Mohammed".into()),
            patient_name: Some("Patient 101 (masked)".into()),
            unit: Some("CCU".into()),
            timestamp: Some(moved_at),
            ..AlertPatch::default()
        });
        assert_eq!(a.status, AlertStatus::Acknowledged);
        assert_eq!(a.assigned_to.as_deref(), Some("Nurse Aisha Mohammed"));
        assert_eq!(a.patient_name.as_deref(), Some("Patient 101 (masked)"));
        assert_eq!(a.unit.as_deref(), Some("CCU"));
        assert_eq!(a.timestamp, moved_at);
        assert_eq!(a.patient_id.as_deref(), Some("PAT-101"));
        assert_eq!(a.title, "Critical Lab Result - Potassium");
        assert_eq!(a.id, "1");

        a.apply(&AlertPatch {
            patient_id: Some("PAT-202".into()),
            ..AlertPatch::default()
        });
        assert_eq!(a.patient_id.as_deref(), Some("PAT-202"));
        assert_eq!(a.unit.as_deref(), Some("CCU"));
    }

    proptest! {
        #[test]
        fn empty_patch_is_identity(level in 0u8..10, title in "[a-zA-Z ]{0,24}") {
            let mut a = alert();
            a.escalation_level = level;
            a.title = title;
            let before = a.clone();
            a.apply(&AlertPatch::default());
            prop_assert_eq!(a, before);
        }
    }
}
