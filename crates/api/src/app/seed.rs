//! Canned records served by the mock API.
//!
//! Timestamps are expressed relative to `now`, which the caller takes once
//! from its clock when the app is built.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use careboard_core::{
    Agent, AgentConfiguration, AgentDetail, AgentStatus, AgentType, Alert, AlertSeverity,
    AlertStatus, BusinessProcess, Kpi, KpiValue, ProcessStatus, ProcessStep, RecentAction,
    StepStatus, Trend,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn kpi(id: &str, name: &str, value: &str, unit: &str, trend: Trend, target: Option<f64>) -> Kpi {
    Kpi {
        id: id.to_string(),
        name: name.to_string(),
        value: KpiValue::from(value),
        unit: Some(unit.to_string()),
        trend: Some(trend),
        target,
    }
}

struct AgentSeed {
    id: &'static str,
    name: &'static str,
    agent_type: AgentType,
    domain: &'static str,
    description: &'static str,
    purpose: &'static str,
}

impl AgentSeed {
    fn build(self, now: DateTime<Utc>) -> Agent {
        Agent {
            id: self.id.to_string(),
            name: self.name.to_string(),
            agent_type: self.agent_type,
            domain: self.domain.to_string(),
            status: AgentStatus::Active,
            description: self.description.to_string(),
            purpose: self.purpose.to_string(),
            kpis: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
            dashboards: Vec::new(),
            last_active: Some(now),
            metrics: None,
        }
    }
}

fn sentinel(now: DateTime<Utc>) -> AgentDetail {
    let mut agent = AgentSeed {
        id: "sentinel",
        name: "Sentinel",
        agent_type: AgentType::Monitor,
        domain: "Patient Safety",
        description: "Real-time patient monitoring and risk detection system",
        purpose: "Continuous surveillance of patient vital signs, lab results, and clinical indicators to provide early warning alerts and prevent adverse events",
    }
    .build(now);
    agent.kpis = vec![
        kpi("sepsis-detection", "Sepsis Detection Lead Time", "12", "minutes", Trend::Down, Some(15.0)),
        kpi("icu-accuracy", "ICU Early Warning Accuracy", "94", "%", Trend::Up, Some(90.0)),
        kpi("alert-fatigue", "Alert Fatigue Reduction", "23", "% fewer false positives", Trend::Down, Some(20.0)),
    ];
    agent.inputs = strings(&["Vital signs", "Lab results", "Medication orders", "Clinical notes"]);
    agent.outputs = strings(&["Critical alerts", "Risk scores", "Trend analysis", "Escalation notifications"]);
    agent.rules = strings(&["SIRS criteria detection", "NEWS/MEWS scoring", "Drug interaction checking", "Critical value thresholds"]);
    agent.dashboards = strings(&["Nursing Supervisor", "CMO", "Emergency Department"]);
    agent.metrics = Some(string_map(&[
        ("accuracy", "94%"),
        ("leadTime", "12 min average"),
        ("reduction", "23% fewer false positives"),
    ]));

    let action = |id: &str, minutes_ago: i64, action: &str, patient: &str| RecentAction {
        id: id.to_string(),
        timestamp: now - Duration::minutes(minutes_ago),
        action: action.to_string(),
        patient: patient.to_string(),
    };

    AgentDetail {
        agent,
        recent_actions: vec![
            action("1", 5, "Critical potassium alert triggered", "Patient 101"),
            action("2", 15, "Sepsis risk detected", "Patient 205"),
            action("3", 30, "Drug interaction warning", "Patient 156"),
        ],
        linked_processes: strings(&[
            "PB-001: Critical Lab Alert Pipeline",
            "PB-005: Sepsis Detection Protocol",
            "PB-012: Medication Safety Check",
        ]),
        configuration: AgentConfiguration {
            alert_thresholds: string_map(&[
                ("Critical Lab Values", "Immediate"),
                ("Sepsis Risk Score", ">= 6"),
                ("Drug Interactions", "Major only"),
            ]),
            escalation_rules: string_map(&[
                ("Level 1", "Primary nurse notification"),
                ("Level 2", "Physician alert + 5min delay"),
                ("Level 3", "Supervisor escalation + 15min"),
            ]),
        },
        api_endpoints: strings(&[
            "GET /api/agents/sentinel/status",
            "POST /api/agents/sentinel/alerts",
            "GET /api/agents/sentinel/metrics",
            "PUT /api/agents/sentinel/config",
        ]),
    }
}

fn navigator(now: DateTime<Utc>) -> AgentDetail {
    let mut agent = AgentSeed {
        id: "navigator",
        name: "Navigator",
        agent_type: AgentType::Explorer,
        domain: "Performance Analytics",
        description: "Advanced analytics platform for clinical performance exploration and benchmarking",
        purpose: "Provide comprehensive analytics and benchmarking capabilities to identify performance variations, improvement opportunities, and best practices across the organization",
    }
    .build(now);
    agent.kpis = vec![
        Kpi {
            id: "physician-benchmarking".into(),
            name: "Physician Performance Variance".into(),
            value: "Cross-specialty analysis".into(),
            unit: None,
            trend: Some(Trend::Stable),
            target: None,
        },
        Kpi {
            id: "unit-variation".into(),
            name: "Unit-to-Unit KPI Variation".into(),
            value: "Mapped across 12 units".into(),
            unit: None,
            trend: Some(Trend::Stable),
            target: None,
        },
        kpi("improvement-opportunities", "Quality Improvement Opportunities", "18 identified", "opportunities", Trend::Up, None),
    ];
    agent.inputs = strings(&["Clinical outcomes", "Process metrics", "Cost data", "Quality indicators"]);
    agent.outputs = strings(&["Performance reports", "Benchmark comparisons", "Improvement recommendations", "Trend forecasts"]);
    agent.rules = strings(&["Statistical variation detection", "Outlier identification", "Peer comparison algorithms", "Improvement opportunity scoring"]);
    agent.dashboards = strings(&["CMO", "Quality Manager", "Department Heads"]);
    agent.metrics = Some(string_map(&[
        ("coverage", "Cross-specialty analysis"),
        ("variation", "KPI variation analysis"),
        ("opportunities", "Quality improvement mapping"),
    ]));
    AgentDetail::bare(agent)
}

fn aegis(now: DateTime<Utc>) -> AgentDetail {
    let mut agent = AgentSeed {
        id: "aegis",
        name: "Aegis",
        agent_type: AgentType::Coordinator,
        domain: "Workflow Orchestration",
        description: "Intelligent workflow coordination and task automation system",
        purpose: "Orchestrate complex clinical workflows, automate routine tasks, and ensure seamless coordination between different departments and systems",
    }
    .build(now);
    agent.kpis = vec![
        kpi("workflow-automation", "Workflow Automation Rate", "78", "%", Trend::Up, Some(80.0)),
        kpi("task-completion", "Task Completion Time", "32", "% reduction", Trend::Down, Some(30.0)),
        kpi("coordination-efficiency", "Coordination Efficiency", "89", "%", Trend::Up, Some(85.0)),
    ];
    agent.inputs = strings(&["Workflow triggers", "Task queues", "User preferences", "System status"]);
    agent.outputs = strings(&["Automated workflows", "Task assignments", "Progress tracking", "Exception handling"]);
    agent.rules = strings(&["Priority-based routing", "Load balancing", "SLA enforcement", "Escalation protocols"]);
    agent.dashboards = strings(&["Operations Manager", "Department Supervisors", "IT Administrator"]);
    AgentDetail::bare(agent)
}

fn synthesizer(now: DateTime<Utc>) -> AgentDetail {
    let mut agent = AgentSeed {
        id: "synthesizer",
        name: "Synthesizer",
        agent_type: AgentType::Synthesizer,
        domain: "Documentation",
        description: "AI-powered clinical documentation synthesis and automation",
        purpose: "Transform clinical data into comprehensive, accurate documentation while reducing manual effort and improving consistency",
    }
    .build(now);
    agent.kpis = vec![
        kpi("documentation-time", "Documentation Time Reduction", "73", "% reduction", Trend::Down, Some(70.0)),
        kpi("accuracy-improvement", "Documentation Accuracy", "96", "%", Trend::Up, Some(95.0)),
        kpi("template-usage", "AI Template Adoption", "84", "%", Trend::Up, Some(80.0)),
    ];
    agent.inputs = strings(&["Clinical data", "Patient records", "Voice notes", "Structured templates"]);
    agent.outputs = strings(&["Discharge summaries", "Progress notes", "Treatment plans", "ICD code suggestions"]);
    agent.rules = strings(&["Clinical documentation guidelines", "ICD-10 mapping", "Template matching", "Quality validation"]);
    agent.dashboards = strings(&["HIM/Coding Manager", "Clinical Documentation", "Quality Assurance"]);
    AgentDetail::bare(agent)
}

fn archivist(now: DateTime<Utc>) -> AgentDetail {
    let mut agent = AgentSeed {
        id: "archivist",
        name: "Archivist",
        agent_type: AgentType::Archivist,
        domain: "Audit & Compliance",
        description: "Comprehensive audit trail and compliance monitoring system",
        purpose: "Maintain detailed audit trails, ensure compliance with regulations, and provide complete transparency for all system activities",
    }
    .build(now);
    agent.kpis = vec![
        kpi("audit-coverage", "Audit Trail Coverage", "100", "%", Trend::Stable, Some(100.0)),
        kpi("compliance-score", "Compliance Score", "97", "%", Trend::Up, Some(95.0)),
        kpi("evidence-availability", "Evidence Availability", "99.8", "%", Trend::Stable, Some(99.0)),
    ];
    agent.inputs = strings(&["System logs", "User actions", "Data changes", "Access records"]);
    agent.outputs = strings(&["Audit reports", "Compliance dashboards", "Evidence packages", "Access logs"]);
    agent.rules = strings(&["HIPAA compliance", "JCI requirements", "Data retention policies", "Access control validation"]);
    agent.dashboards = strings(&["Security Officer", "Compliance Manager", "Quality Assurance"]);
    AgentDetail::bare(agent)
}

/// The agent catalog, in display order.
pub fn agents(now: DateTime<Utc>) -> Vec<AgentDetail> {
    vec![
        sentinel(now),
        navigator(now),
        aegis(now),
        synthesizer(now),
        archivist(now),
    ]
}

#[allow(clippy::too_many_arguments)]
fn alert(
    id: &str,
    severity: AlertSeverity,
    title: &str,
    description: &str,
    patient: (&str, &str),
    unit: &str,
    status: AlertStatus,
    assigned_to: &str,
    escalation_level: u8,
    raised: DateTime<Utc>,
    sla_deadline: DateTime<Utc>,
) -> Alert {
    Alert {
        id: id.to_string(),
        severity,
        title: title.to_string(),
        description: description.to_string(),
        patient_id: Some(patient.0.to_string()),
        patient_name: Some(patient.1.to_string()),
        unit: Some(unit.to_string()),
        timestamp: raised,
        status,
        assigned_to: Some(assigned_to.to_string()),
        escalation_level,
        sla_deadline: Some(sla_deadline),
    }
}

/// Initial alert feed, newest last as in the source listing.
pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    let ago = |m: i64| now - Duration::minutes(m);
    let ahead = |m: i64| now + Duration::minutes(m);
    vec![
        alert(
            "1",
            AlertSeverity::Critical,
            "Critical Lab Result - Potassium",
            "Patient 101: Potassium level 6.8 mEq/L (Critical: >6.5)",
            ("PAT-101", "Ahmed M. (masked)"),
            "ICU",
            AlertStatus::Active,
            "Dr. Sarah Al-Rashid",
            1,
            ago(5),
            ahead(15),
        ),
        alert(
            "2",
            AlertSeverity::High,
            "Sepsis Risk Alert",
            "Patient 205: SIRS criteria met, elevated lactate",
            ("PAT-205", "Fatima K. (masked)"),
            "Emergency",
            AlertStatus::Acknowledged,
            "Dr. Ahmed Hassan",
            2,
            ago(15),
            ahead(5),
        ),
        alert(
            "3",
            AlertSeverity::Medium,
            "Medication Interaction",
            "Patient 156: Potential warfarin-amiodarone interaction",
            ("PAT-156", "Khalid A. (masked)"),
            "Cardiology",
            AlertStatus::Resolved,
            "Dr. Layla Ibrahim",
            1,
            ago(30),
            ago(10),
        ),
        alert(
            "4",
            AlertSeverity::Critical,
            "Respiratory Distress",
            "Patient 089: SpO2 85%, increased respiratory rate",
            ("PAT-089", "Omar S. (masked)"),
            "ICU",
            AlertStatus::Active,
            "Nurse Aisha Mohammed",
            2,
            ago(10),
            ahead(10),
        ),
    ]
}

fn steps(items: &[(&str, StepStatus, Option<u32>)]) -> Vec<ProcessStep> {
    items
        .iter()
        .enumerate()
        .map(|(i, (name, status, duration))| ProcessStep {
            id: (i + 1).to_string(),
            name: name.to_string(),
            status: *status,
            duration: *duration,
            timestamp: None,
            description: None,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn flow(
    id: &str,
    name: &str,
    description: &str,
    status: ProcessStatus,
    sla_minutes: u32,
    owner: &str,
    steps: Vec<ProcessStep>,
    last_run: DateTime<Utc>,
) -> BusinessProcess {
    BusinessProcess {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        status,
        steps,
        sla: Some(sla_minutes),
        owner: Some(owner.to_string()),
        last_run: Some(last_run),
        success_rate: None,
    }
}

/// Process flows shown on the processes page.
pub fn processes(now: DateTime<Utc>) -> Vec<BusinessProcess> {
    use StepStatus::{Completed, Pending, Running};

    vec![
        flow(
            "FLOW-001",
            "Patient Admission → Vitals Digitization → EWS Computation",
            "Admission vitals captured digitally and scored for early warning",
            ProcessStatus::Completed,
            7,
            "Sentinel",
            steps(&[
                ("Patient Registration", Completed, Some(120)),
                ("Vitals Collection", Completed, Some(180)),
                ("EWS Calculation", Completed, Some(30)),
                ("Risk Assessment", Completed, Some(60)),
            ]),
            now - Duration::minutes(40),
        ),
        flow(
            "FLOW-002",
            "Critical Lab Result → Alert → Task Routing → Escalation",
            "Critical laboratory values routed to the care team with timed escalation",
            ProcessStatus::Active,
            5,
            "Aegis",
            steps(&[
                ("Lab Result Received", Completed, Some(0)),
                ("Critical Value Detection", Completed, Some(15)),
                ("Alert Generation", Completed, Some(30)),
                ("Nurse Notification", Running, Some(120)),
                ("Physician Escalation", Pending, None),
            ]),
            now - Duration::minutes(3),
        ),
        flow(
            "FLOW-003",
            "Discharge Planning → Documentation → ICD Coding",
            "Discharge summary drafted and coded, awaiting physician review",
            ProcessStatus::Paused,
            15,
            "Synthesizer",
            steps(&[
                ("Discharge Order", Completed, Some(60)),
                ("Summary Generation", Completed, Some(300)),
                ("ICD Code Suggestion", Completed, Some(120)),
                ("Physician Review", Pending, None),
            ]),
            now - Duration::minutes(8),
        ),
        flow(
            "FLOW-004",
            "Quality Audit → NC Detection → CAPA Creation → Verification",
            "Audit findings turned into corrective and preventive actions",
            ProcessStatus::Completed,
            120,
            "Navigator",
            steps(&[
                ("Audit Execution", Completed, Some(1800)),
                ("Finding Analysis", Completed, Some(600)),
                ("CAPA Generation", Completed, Some(300)),
                ("Assignment & Notification", Completed, Some(120)),
                ("Verification Planning", Pending, None),
            ]),
            now - Duration::hours(5),
        ),
    ]
}
