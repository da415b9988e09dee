//! Read and write paths used by the dashboards.
//!
//! Reads go through the [`QueryCache`]; writes go through
//! [`QueryCache::mutate`] so affected keys are invalidated once the server
//! has answered, and any locally tracked state lands in the [`AppStore`].

use std::sync::Arc;

use careboard_core::{
    Agent, AgentDetail, Alert, BusinessProcess, Persona, TriggerAlertRequest,
    TriggerAlertResponse, TriggerDischargeRequest, TriggerDischargeResponse,
};

use crate::api::{ApiClient, ClientError};
use crate::query::{QueryCache, QueryError, QueryKey};
use crate::store::AppStore;

#[derive(Debug, Clone)]
pub struct DataLayer {
    api: ApiClient,
    cache: QueryCache,
    store: AppStore,
}

impl DataLayer {
    pub fn new(api: ApiClient, cache: QueryCache, store: AppStore) -> Self {
        Self { api, cache, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub async fn agents(&self) -> Result<Arc<Vec<Agent>>, QueryError> {
        let api = self.api.clone();
        self.cache
            .query(QueryKey::agents(), move || {
                let api = api.clone();
                async move { api.get_agents().await }
            })
            .await
    }

    /// Agent detail. An empty id is not fetched at all.
    pub async fn agent(&self, id: &str) -> Result<Option<Arc<AgentDetail>>, QueryError> {
        if id.is_empty() {
            return Ok(None);
        }
        let api = self.api.clone();
        let owned = id.to_string();
        self.cache
            .query(QueryKey::agent(id), move || {
                let api = api.clone();
                let id = owned.clone();
                async move { api.get_agent(&id).await }
            })
            .await
            .map(Some)
    }

    pub async fn alerts(&self, alert_type: Option<&str>) -> Result<Arc<Vec<Alert>>, QueryError> {
        let api = self.api.clone();
        let filter = alert_type.map(str::to_string);
        self.cache
            .query(QueryKey::alerts(alert_type), move || {
                let api = api.clone();
                let filter = filter.clone();
                async move { api.get_alerts(filter.as_deref()).await }
            })
            .await
    }

    pub async fn processes(&self) -> Result<Arc<Vec<BusinessProcess>>, QueryError> {
        let api = self.api.clone();
        self.cache
            .query(QueryKey::processes(), move || {
                let api = api.clone();
                async move { api.get_processes().await }
            })
            .await
    }

    pub async fn personas(&self) -> Result<Arc<Vec<Persona>>, QueryError> {
        let api = self.api.clone();
        self.cache
            .query(QueryKey::personas(), move || {
                let api = api.clone();
                async move { api.get_personas().await }
            })
            .await
    }

    /// Raise a demo critical alert. On success every alert query is
    /// invalidated and the new alert is prepended to the store.
    pub async fn trigger_critical_alert(
        &self,
        req: TriggerAlertRequest,
    ) -> Result<TriggerAlertResponse, ClientError> {
        let api = &self.api;
        let resp = self
            .cache
            .mutate(
                || async move { api.trigger_critical_alert(&req).await },
                &[QueryKey::alerts(None)],
            )
            .await?;
        tracing::info!(alert_id = %resp.alert.id, "critical alert triggered");
        self.store.add_alert(resp.alert.clone());
        Ok(resp)
    }

    pub async fn trigger_discharge_workflow(
        &self,
        req: TriggerDischargeRequest,
    ) -> Result<TriggerDischargeResponse, ClientError> {
        let api = &self.api;
        let resp = self
            .cache
            .mutate(
                || async move { api.trigger_discharge_workflow(&req).await },
                &[QueryKey::processes()],
            )
            .await?;
        tracing::info!(workflow_id = %resp.workflow.id, "discharge workflow triggered");
        Ok(resp)
    }

    /// Probe `/health` and record the result as the store's online flag.
    pub async fn refresh_connectivity(&self) -> bool {
        let online = self.api.check_connectivity().await;
        if online != self.store.is_online() {
            tracing::info!(online, "connectivity changed");
        }
        self.store.set_online_status(online);
        online
    }

    pub fn load_initial_data(&self) {
        self.store.load_initial_data();
    }

    /// See [`AppStore::select_persona`].
    pub fn select_persona(&self, id: &str) -> Option<String> {
        self.store.select_persona(id)
    }
}
