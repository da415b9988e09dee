//! HTTP client for the mock API.

use serde::Serialize;
use serde::de::DeserializeOwned;

use careboard_core::{
    Agent, AgentDetail, Alert, BusinessProcess, Persona, TriggerAlertRequest,
    TriggerAlertResponse, TriggerDischargeRequest, TriggerDischargeResponse,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// One method per endpoint. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api(status.as_u16(), body));
        }
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read_json(resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read_json(resp).await
    }

    pub async fn get_agents(&self) -> Result<Vec<Agent>, ClientError> {
        self.get_json("/agents", &[]).await
    }

    pub async fn get_agent(&self, id: &str) -> Result<AgentDetail, ClientError> {
        self.get_json(&format!("/agents/{id}"), &[]).await
    }

    /// Alert feed, optionally filtered by severity (`critical`, `high`, ...).
    pub async fn get_alerts(&self, alert_type: Option<&str>) -> Result<Vec<Alert>, ClientError> {
        match alert_type {
            Some(t) => self.get_json("/alerts", &[("type", t)]).await,
            None => self.get_json("/alerts", &[]).await,
        }
    }

    pub async fn get_processes(&self) -> Result<Vec<BusinessProcess>, ClientError> {
        self.get_json("/processes", &[]).await
    }

    pub async fn get_personas(&self) -> Result<Vec<Persona>, ClientError> {
        self.get_json("/personas", &[]).await
    }

    pub async fn trigger_critical_alert(
        &self,
        req: &TriggerAlertRequest,
    ) -> Result<TriggerAlertResponse, ClientError> {
        self.post_json("/alerts/trigger", req).await
    }

    pub async fn trigger_discharge_workflow(
        &self,
        req: &TriggerDischargeRequest,
    ) -> Result<TriggerDischargeResponse, ClientError> {
        self.post_json("/workflows/discharge-summary/trigger", req)
            .await
    }

    /// True when `/health` answers with a success status.
    pub async fn check_connectivity(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
