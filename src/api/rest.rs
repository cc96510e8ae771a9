//! Implements the sync adapter traits against the REST/JSON backend.

use crate::api::{
    BudgetApi, CreateTransactionRequest, PeriodPlannedAmounts, PeriodTransactions,
    RemoteTransaction, RemoveTransactionRequest, TransactionApi, UpsertPlannedAmountRequest,
};
use crate::{Error, Result};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;
use url::Url;

/// Talks to the backing store over HTTP. Holds no ledger state; every call is
/// an independent request/response exchange.
pub(crate) struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Creates a client for the service at `server_url`, e.g.
    /// `http://localhost:5001`.
    pub(crate) fn new(server_url: &str) -> Result<Self> {
        let base_url = Url::parse(server_url)
            .with_context(|| format!("Invalid server URL '{server_url}'"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Unable to construct endpoint URL for '{path}'"))
            .map_err(Into::into)
    }

    /// Issues a GET and deserializes the JSON response body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        trace!("GET {path}");
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await.map_err(Error::sync)?;
        let response = response.error_for_status().map_err(Error::sync)?;
        response.json().await.map_err(Error::sync)
    }

    /// Issues a POST with a JSON body and returns the raw response for the
    /// caller to interpret.
    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        trace!("POST {path}");
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::sync)?;
        response.error_for_status().map_err(Error::sync)
    }
}

#[async_trait::async_trait]
impl TransactionApi for RestClient {
    async fn list_transactions(&self) -> Result<Vec<PeriodTransactions>> {
        self.get_json("api/transactions").await
    }

    async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<RemoteTransaction> {
        let response = self.post_json("api/transactions/add", request).await?;
        response.json().await.map_err(Error::sync)
    }

    async fn delete_transaction(&self, request: &RemoveTransactionRequest) -> Result<()> {
        // The backend responds with the updated document; only the status
        // matters here.
        let _ = self.post_json("api/transactions/remove", request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BudgetApi for RestClient {
    async fn list_planned_amounts(&self) -> Result<Vec<PeriodPlannedAmounts>> {
        self.get_json("api/categories").await
    }

    async fn upsert_planned_amount(&self, request: &UpsertPlannedAmountRequest) -> Result<()> {
        let _ = self.post_json("api/categories/update", request).await?;
        Ok(())
    }
}
