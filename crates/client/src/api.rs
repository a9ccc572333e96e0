//! REST client for the SoleSync API.
//!
//! Every success body is a `{ "data": ... }` envelope and every error body
//! is `{ "error": ..., "code": ... }`. [`SoleSyncApi`] unwraps the former
//! and turns the latter into [`ClientError::Api`].

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use solesync_core::appointment::default_slot_end;
use tokio::sync::RwLock;
use urlencoding::encode;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Announcement, Appointment, Branch, CanceledSlotCheck, Customer, Dates, LineItem, LoginSession,
    NewAppointment, NewCustomer, Promo, Service, Unavailability,
};

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for one SoleSync backend.
pub struct SoleSyncApi {
    client: reqwest::Client,
    api_url: String,
    token: RwLock<Option<String>>,
    /// Branch names by id; filled by [`SoleSyncApi::branch_name`].
    branch_names: RwLock<HashMap<String, String>>,
}

impl SoleSyncApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url(),
            token: RwLock::new(None),
            branch_names: RwLock::new(HashMap::new()),
        }
    }

    /// Use a stored session token for protected endpoints.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    // ---- customers ----

    pub async fn register(&self, customer: &NewCustomer) -> ClientResult<Customer> {
        let response = self
            .client
            .post(self.url("/customers"))
            .json(customer)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Log in and keep the returned token for later protected calls.
    pub async fn login(
        &self,
        first_name: &str,
        last_name: &str,
        birthdate: NaiveDate,
    ) -> ClientResult<LoginSession> {
        let body = json!({
            "firstName": first_name,
            "lastName": last_name,
            "cust_bdate": birthdate.format("%Y-%m-%d").to_string(),
        });
        let response = self
            .client
            .post(self.url("/customers/login"))
            .json(&body)
            .send()
            .await?;
        let session: LoginSession = Self::parse_data(response).await?;

        self.set_token(Some(session.token.clone())).await;
        tracing::info!(user_id = %session.user_id, "Logged in");
        Ok(session)
    }

    pub async fn customer(&self, cust_id: &str) -> ClientResult<Customer> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(self.url(&format!("/customers/{}", encode(cust_id))))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn credibility(&self, cust_id: &str) -> ClientResult<i32> {
        Ok(self.customer(cust_id).await?.credibility)
    }

    // ---- appointments ----

    pub async fn add_appointment(&self, appointment: &NewAppointment) -> ClientResult<Appointment> {
        let response = self
            .client
            .post(self.url("/appointments"))
            .json(appointment)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Book the standard-length slot starting at `start`.
    pub async fn book_slot(
        &self,
        cust_id: &str,
        branch_id: &str,
        date: NaiveDate,
        start: NaiveTime,
    ) -> ClientResult<Appointment> {
        self.add_appointment(&NewAppointment {
            cust_id: cust_id.to_string(),
            branch_id: branch_id.to_string(),
            date_for_inquiry: date,
            time_start: start,
            time_end: default_slot_end(start),
        })
        .await
    }

    /// The customer's next non-canceled appointment. "None upcoming" is
    /// `Ok(None)`, not an error.
    pub async fn upcoming_appointment(&self, cust_id: &str) -> ClientResult<Option<Appointment>> {
        let response = self
            .client
            .get(self.url(&format!("/appointments/customer/{}", encode(cust_id))))
            .send()
            .await?;
        match Self::parse_data(response).await {
            Ok(appointment) => Ok(Some(appointment)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn cancel_appointment(&self, appointment_id: &str) -> ClientResult<Appointment> {
        let response = self
            .client
            .patch(self.url(&format!("/appointments/{}/cancel", encode(appointment_id))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn delete_appointment(&self, appointment_id: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/appointments/{}", encode(appointment_id))))
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn delete_pending(&self, cust_id: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&format!(
                "/appointments/customer/{}/pending",
                encode(cust_id)
            )))
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn check_canceled_slot(
        &self,
        cust_id: &str,
        branch_id: &str,
        date: NaiveDate,
        start: NaiveTime,
    ) -> ClientResult<CanceledSlotCheck> {
        let date = date.format("%Y-%m-%d").to_string();
        let start = start.format("%H:%M").to_string();
        let response = self
            .client
            .get(self.url("/appointments/canceled/check"))
            .query(&[
                ("cust_id", cust_id),
                ("branch_id", branch_id),
                ("date_for_inquiry", date.as_str()),
                ("time_start", start.as_str()),
            ])
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn unavailability(
        &self,
        branch_id: &str,
        date: NaiveDate,
    ) -> ClientResult<Vec<Unavailability>> {
        let date = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(self.url("/unavailability"))
            .query(&[("branch_id", branch_id), ("date", date.as_str())])
            .send()
            .await?;
        Self::parse_data(response).await
    }

    // ---- branches & services ----

    pub async fn branches(&self) -> ClientResult<Vec<Branch>> {
        let response = self.client.get(self.url("/branches/b")).send().await?;
        Self::parse_data(response).await
    }

    pub async fn branch(&self, branch_id: &str) -> ClientResult<Branch> {
        let response = self
            .client
            .get(self.url(&format!("/branches/{}", encode(branch_id))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Display name of a branch. Successful lookups are cached; any failure
    /// falls back to the id itself.
    pub async fn branch_name(&self, branch_id: &str) -> String {
        if let Some(name) = self.branch_names.read().await.get(branch_id) {
            return name.clone();
        }
        match self.branch(branch_id).await {
            Ok(branch) => {
                self.branch_names
                    .write()
                    .await
                    .insert(branch_id.to_string(), branch.branch_name.clone());
                branch.branch_name
            }
            Err(e) => {
                tracing::warn!(branch_id, error = %e, "Branch name lookup failed");
                branch_id.to_string()
            }
        }
    }

    pub async fn service(&self, service_id: &str) -> ClientResult<Service> {
        let response = self
            .client
            .get(self.url(&format!("/services/{}", encode(service_id))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn service_name(&self, service_id: &str) -> ClientResult<String> {
        Ok(self.service(service_id).await?.service_name)
    }

    // ---- tracking ----

    pub async fn line_items(&self, cust_id: &str) -> ClientResult<Vec<LineItem>> {
        let response = self
            .client
            .get(self.url(&format!("/line-items/customer/{}", encode(cust_id))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn line_item(&self, line_item_id: &str) -> ClientResult<LineItem> {
        let response = self
            .client
            .get(self.url(&format!("/line-items/{}", encode(line_item_id))))
            .send()
            .await?;
        Self::parse_data(response).await
    }

    pub async fn dates(&self, line_item_id: &str) -> ClientResult<Dates> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(self.url(&format!("/dates/{}", encode(line_item_id))))
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    // ---- content ----

    pub async fn announcements(&self) -> ClientResult<Vec<Announcement>> {
        let response = self.client.get(self.url("/announcements")).send().await?;
        Self::parse_data(response).await
    }

    pub async fn promos(&self) -> ClientResult<Vec<Promo>> {
        let response = self.client.get(self.url("/promos")).send().await?;
        Self::parse_data(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn bearer(&self) -> ClientResult<String> {
        self.token.read().await.clone().ok_or(ClientError::NotSignedIn)
    }

    /// Turn a non-2xx response into [`ClientError::Api`], preferring the
    /// `error` message of the JSON body.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<DataEnvelope<T>>().await?.data)
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<()> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
