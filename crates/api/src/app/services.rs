//! In-memory mock data and the operations the routes expose.
//!
//! State lives only for the life of the process: triggered alerts and
//! discharge runs are appended to in-memory lists and vanish on restart.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};

use careboard_core::{
    Agent, AgentDetail, AiSuggestions, Alert, AlertSeverity, AlertStatus, BusinessProcess, Clock,
    DischargeWorkflow, DomainError, DomainResult, EstimatedSavings, Persona, ProcessStatus,
    ProcessStep, StepStatus, TriggerAlertRequest, TriggerAlertResponse, TriggerDischargeRequest,
    TriggerDischargeResponse, WorkflowStep, WorkflowStepStatus, find_by_id, seed_personas,
};

use crate::app::seed;

/// SLA window granted to a freshly triggered alert, in minutes.
pub const ALERT_SLA_MINUTES: i64 = 15;
/// Expected runtime of the discharge summary workflow, in minutes.
pub const DISCHARGE_ETA_MINUTES: i64 = 8;

pub const DEFAULT_PATIENT_ID: &str = "PAT-DEMO-001";

pub struct AppServices {
    clock: Arc<dyn Clock>,
    agents: Vec<AgentDetail>,
    personas: Vec<Persona>,
    alerts: RwLock<Vec<Alert>>,
    processes: RwLock<Vec<BusinessProcess>>,
}

// Every write below is a single insert, so a poisoned lock still holds a
// consistent list.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// `value` unless it is missing or empty.
fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Build the services, seeding every list from the clock's current time.
pub fn build_services(clock: Arc<dyn Clock>) -> AppServices {
    let now = clock.now();
    AppServices {
        agents: seed::agents(now),
        personas: seed_personas(),
        alerts: RwLock::new(seed::alerts(now)),
        processes: RwLock::new(seed::processes(now)),
        clock,
    }
}

impl AppServices {
    pub fn agents_list(&self) -> Vec<Agent> {
        self.agents.iter().map(|d| d.agent.clone()).collect()
    }

    pub fn agent_get(&self, id: &str) -> DomainResult<AgentDetail> {
        find_by_id(&self.agents, id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Agent", id))
    }

    /// Alert feed, optionally restricted to one `type`. Unknown types match
    /// nothing.
    pub fn alerts_list(&self, alert_type: Option<&str>) -> Vec<Alert> {
        let severity = match alert_type.map(str::parse::<AlertSeverity>) {
            None => None,
            Some(Ok(severity)) => Some(severity),
            Some(Err(err)) => {
                tracing::debug!(error = %err, "alert filter matches nothing");
                return vec![];
            }
        };
        let feed = read(&self.alerts);
        match severity {
            Some(severity) => feed
                .iter()
                .filter(|a| a.severity == severity)
                .cloned()
                .collect(),
            None => feed.clone(),
        }
    }

    pub fn personas_list(&self) -> Vec<Persona> {
        self.personas.clone()
    }

    pub fn processes_list(&self) -> Vec<BusinessProcess> {
        read(&self.processes).clone()
    }

    /// Fabricate a critical alert and put it at the head of the feed.
    pub fn trigger_alert(&self, req: TriggerAlertRequest) -> TriggerAlertResponse {
        let now = self.clock.now();
        let alert = Alert {
            id: now.timestamp_millis().to_string(),
            severity: AlertSeverity::Critical,
            title: non_empty_or(req.title, "Critical Lab Alert - Demo"),
            description: non_empty_or(
                req.description,
                "Simulated critical lab result for demonstration",
            ),
            patient_id: Some(non_empty_or(req.patient_id, DEFAULT_PATIENT_ID)),
            patient_name: Some(non_empty_or(req.patient_name, "Demo Patient (masked)")),
            unit: Some(non_empty_or(req.unit, "ICU")),
            timestamp: now,
            status: AlertStatus::Active,
            assigned_to: Some(non_empty_or(req.assigned_to, "Dr. Demo Physician")),
            escalation_level: 1,
            sla_deadline: Some(now + Duration::minutes(ALERT_SLA_MINUTES)),
        };

        write(&self.alerts).insert(0, alert.clone());
        tracing::info!(alert_id = %alert.id, patient_id = ?alert.patient_id, "critical alert triggered");

        TriggerAlertResponse {
            success: true,
            alert,
            message: "Critical alert triggered successfully".to_string(),
            actions: vec![
                "Alert sent to primary nurse".to_string(),
                "Escalation timer started (5 minutes)".to_string(),
                "WhatsApp notification prepared".to_string(),
                "Workflow automation initiated".to_string(),
            ],
        }
    }

    /// Fabricate a discharge summary workflow and record it as a process run.
    pub fn trigger_discharge(&self, req: TriggerDischargeRequest) -> TriggerDischargeResponse {
        let now = self.clock.now();
        let workflow = discharge_workflow(now, non_empty_or(req.patient_id, DEFAULT_PATIENT_ID));

        write(&self.processes).insert(0, workflow_as_process(&workflow, now));
        tracing::info!(workflow_id = %workflow.id, patient_id = %workflow.patient_id, "discharge workflow initiated");

        TriggerDischargeResponse {
            success: true,
            workflow,
            message: "Discharge summary workflow initiated".to_string(),
            estimated_savings: EstimatedSavings {
                time: "37 minutes saved (45 min → 8 min)".to_string(),
                accuracy: "18% improvement in coding accuracy".to_string(),
                compliance: "Automated JCI documentation standards".to_string(),
            },
        }
    }
}

fn discharge_workflow(now: DateTime<Utc>, patient_id: String) -> DischargeWorkflow {
    let step = |id: u32, name: &str, status: WorkflowStepStatus, description: &str| WorkflowStep {
        id,
        name: name.to_string(),
        status,
        timestamp: (status != WorkflowStepStatus::Pending).then_some(now),
        description: description.to_string(),
    };

    DischargeWorkflow {
        id: format!("DSW-{}", now.timestamp_millis()),
        patient_id,
        status: "initiated".to_string(),
        steps: vec![
            step(1, "Data Collection", WorkflowStepStatus::Completed, "Gathered patient data from EMR"),
            step(2, "AI Template Generation", WorkflowStepStatus::InProgress, "Generating discharge summary template"),
            step(3, "ICD Code Suggestion", WorkflowStepStatus::Pending, "AI-powered ICD-10 code recommendations"),
            step(4, "Clinical Review", WorkflowStepStatus::Pending, "Physician review and approval"),
            step(5, "Documentation Complete", WorkflowStepStatus::Pending, "Final documentation in patient record"),
        ],
        estimated_completion: now + Duration::minutes(DISCHARGE_ETA_MINUTES),
        ai_suggestions: AiSuggestions {
            primary_diagnosis:
                "J44.1 - Chronic obstructive pulmonary disease with acute exacerbation".to_string(),
            secondary_diagnoses: vec![
                "I10 - Essential hypertension".to_string(),
                "E11.9 - Type 2 diabetes mellitus without complications".to_string(),
            ],
            procedures: vec!["94640 - Pressurized or nonpressurized inhalation treatment".to_string()],
            medications: vec![
                "Albuterol inhaler 2 puffs q6h PRN".to_string(),
                "Prednisone 40mg PO daily x 5 days".to_string(),
            ],
        },
    }
}

fn workflow_as_process(workflow: &DischargeWorkflow, now: DateTime<Utc>) -> BusinessProcess {
    let steps = workflow
        .steps
        .iter()
        .map(|s| ProcessStep {
            id: s.id.to_string(),
            name: s.name.clone(),
            status: match s.status {
                WorkflowStepStatus::Completed => StepStatus::Completed,
                WorkflowStepStatus::InProgress => StepStatus::Running,
                WorkflowStepStatus::Pending => StepStatus::Pending,
            },
            duration: None,
            timestamp: s.timestamp,
            description: Some(s.description.clone()),
        })
        .collect();

    BusinessProcess {
        id: workflow.id.clone(),
        name: format!("Discharge Summary Automation ({})", workflow.patient_id),
        description: "AI-assisted discharge documentation workflow".to_string(),
        status: ProcessStatus::Active,
        steps,
        sla: Some(DISCHARGE_ETA_MINUTES as u32),
        owner: Some("Synthesizer".to_string()),
        last_run: Some(now),
        success_rate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careboard_core::{Entity, ManualClock};
    use chrono::TimeZone;

    fn services() -> (Arc<ManualClock>, AppServices) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 2, 5, 14, 30, 0).unwrap(),
        ));
        let services = build_services(clock.clone());
        (clock, services)
    }

    #[test]
    fn agent_get_returns_requested_id_or_not_found() {
        let (_, svc) = services();
        for agent in svc.agents_list() {
            assert_eq!(svc.agent_get(&agent.id).unwrap().id(), agent.id);
        }
        assert_eq!(
            svc.agent_get("oracle").unwrap_err(),
            DomainError::not_found("Agent", "oracle")
        );
    }

    #[test]
    fn alerts_filter_by_exact_type() {
        let (_, svc) = services();
        assert_eq!(svc.alerts_list(None).len(), 4);
        let critical = svc.alerts_list(Some("critical"));
        assert_eq!(critical.len(), 2);
        assert!(critical.iter().all(|a| a.severity == AlertSeverity::Critical));
        assert!(svc.alerts_list(Some("CRITICAL")).is_empty());
        assert!(svc.alerts_list(Some("bogus")).is_empty());
    }

    #[test]
    fn triggered_alert_is_active_with_future_deadline_and_heads_the_feed() {
        let (clock, svc) = services();
        clock.advance(Duration::seconds(42));
        let res = svc.trigger_alert(TriggerAlertRequest {
            patient_id: Some("PAT-1".into()),
            ..TriggerAlertRequest::default()
        });

        assert!(res.success);
        assert_eq!(res.alert.patient_id.as_deref(), Some("PAT-1"));
        assert_eq!(res.alert.status, AlertStatus::Active);
        assert_eq!(res.alert.timestamp, clock.now());
        assert_eq!(res.alert.sla_deadline, Some(clock.now() + Duration::minutes(ALERT_SLA_MINUTES)));
        assert_eq!(res.alert.unit.as_deref(), Some("ICU"));
        assert_eq!(res.alert.id, clock.now().timestamp_millis().to_string());

        let feed = svc.alerts_list(None);
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0], res.alert);
    }

    #[test]
    fn discharge_trigger_fills_defaults_and_records_a_run() {
        let (clock, svc) = services();
        let res = svc.trigger_discharge(TriggerDischargeRequest::default());

        assert_eq!(res.workflow.patient_id, DEFAULT_PATIENT_ID);
        assert_eq!(res.workflow.status, "initiated");
        assert_eq!(res.workflow.steps.len(), 5);
        assert!(res.workflow.steps[2].timestamp.is_none());
        assert_eq!(res.workflow.estimated_completion, clock.now() + Duration::minutes(DISCHARGE_ETA_MINUTES));
        assert!(res.workflow.id.starts_with("DSW-"));

        let processes = svc.processes_list();
        assert_eq!(processes.len(), 5);
        assert_eq!(processes[0].id, res.workflow.id);
        assert_eq!(processes[0].steps[1].status, StepStatus::Running);
    }

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let (_, svc) = services();
        let res = svc.trigger_alert(TriggerAlertRequest {
            patient_id: Some(String::new()),
            title: Some(String::new()),
            unit: Some(String::new()),
            ..TriggerAlertRequest::default()
        });
        assert_eq!(res.alert.patient_id.as_deref(), Some(DEFAULT_PATIENT_ID));
        assert_eq!(res.alert.title, "Critical Lab Alert - Demo");
        assert_eq!(res.alert.unit.as_deref(), Some("ICU"));

        let run = svc.trigger_discharge(TriggerDischargeRequest {
            patient_id: Some(String::new()),
        });
        assert_eq!(run.workflow.patient_id, DEFAULT_PATIENT_ID);
    }

    #[test]
    fn poisoned_feed_still_records_triggers() {
        let (_, svc) = services();
        let svc = Arc::new(svc);
        let poison = Arc::clone(&svc);
        let _ = std::thread::spawn(move || {
            let _guard = poison.alerts.write().unwrap();
            panic!("poison the alert feed");
        })
        .join();
        assert!(svc.alerts.is_poisoned());

        let res = svc.trigger_alert(TriggerAlertRequest::default());
        let feed = svc.alerts_list(None);
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].id, res.alert.id);
    }
}
