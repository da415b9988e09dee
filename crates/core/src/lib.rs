//! `careboard-core`: records and primitives shared by the mock API and the
//! client data layer.
//!
//! Everything here is plain data: no IO, no async.

pub mod clock;
pub mod entity;
pub mod error;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use model::{
    Agent, AgentConfiguration, AgentDetail, AgentStatus, AgentType, AiSuggestions, Alert,
    AlertPatch, AlertSeverity, AlertStatus, BusinessProcess, DischargeWorkflow, EstimatedSavings,
    Kpi, KpiValue, Persona, ProcessStatus, ProcessStep, RecentAction, StepStatus, Trend,
    TriggerAlertRequest, TriggerAlertResponse, TriggerDischargeRequest, TriggerDischargeResponse,
    User, UserRole, WorkflowStep, WorkflowStepStatus, seed_personas,
};
