//! Resource records served by the mock API and cached by the client.
//!
//! Field names serialize in camelCase so the wire shape matches what the
//! dashboards consume.

pub mod agent;
pub mod alert;
pub mod persona;
pub mod process;
pub mod trigger;

pub use agent::{
    Agent, AgentConfiguration, AgentDetail, AgentStatus, AgentType, Kpi, KpiValue, RecentAction,
    Trend,
};
pub use alert::{Alert, AlertPatch, AlertSeverity, AlertStatus};
pub use persona::{Persona, User, UserRole, seed_personas};
pub use process::{BusinessProcess, ProcessStatus, ProcessStep, StepStatus};
pub use trigger::{
    AiSuggestions, DischargeWorkflow, EstimatedSavings, TriggerAlertRequest, TriggerAlertResponse,
    TriggerDischargeRequest, TriggerDischargeResponse, WorkflowStep, WorkflowStepStatus,
};
