use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Active,
    Paused,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStep {
    pub id: String,
    pub name: String,
    pub status: StepStatus,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A process flow shown on the processes page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProcess {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ProcessStatus,
    pub steps: Vec<ProcessStep>,
    /// SLA target in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

impl BusinessProcess {
    /// Number of completed steps over total, as a percentage.
    pub fn progress(&self) -> u8 {
        if self.steps.is_empty() {
            return 0;
        }
        let done = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();
        ((done * 100) / self.steps.len()) as u8
    }
}

impl Entity for BusinessProcess {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(status: StepStatus) -> ProcessStep {
        ProcessStep {
            id: "s".into(),
            name: "step".into(),
            status,
            duration: None,
            timestamp: None,
            description: None,
        }
    }

    #[test]
    fn progress_counts_completed_steps() {
        let mut p = BusinessProcess {
            id: "FLOW-003".into(),
            name: "Discharge Planning".into(),
            description: String::new(),
            status: ProcessStatus::Active,
            steps: vec![],
            sla: Some(15),
            owner: None,
            last_run: None,
            success_rate: None,
        };
        assert_eq!(p.progress(), 0);

        p.steps = vec![
            step(StepStatus::Completed),
            step(StepStatus::Completed),
            step(StepStatus::Completed),
            step(StepStatus::Pending),
        ];
        assert_eq!(p.progress(), 75);
    }
}
