use anyhow::{bail, Result};
use common::models::Customer;
use reqwest::{Client as HttpClient, Response};
use tracing::info;

/// HTTP client for the record service's `/users` endpoints.
#[derive(Clone)]
pub struct ApiClient {
    api_base: String,
    client: HttpClient,
}

impl ApiClient {
    pub fn new(api_base: String) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client: HttpClient::new(),
        }
    }

    fn user_url(&self, phone: &str) -> String {
        format!("{}/users/{}", self.api_base, urlencoding::encode(phone))
    }

    pub async fn list(&self) -> Result<Vec<Customer>> {
        let response = self
            .client
            .get(format!("{}/users", self.api_base))
            .send()
            .await?;

        let response = ensure_ok(response, "Failed to load users").await?;
        Ok(response.json::<Vec<Customer>>().await?)
    }

    pub async fn create(&self, customer: &Customer) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/users", self.api_base))
            .json(customer)
            .send()
            .await?;

        ensure_ok(response, "Failed to save user").await?;
        info!("User saved successfully");
        Ok(())
    }

    pub async fn update(&self, phone: &str, customer: &Customer) -> Result<()> {
        let response = self
            .client
            .put(self.user_url(phone))
            .json(customer)
            .send()
            .await?;

        ensure_ok(response, "Failed to update user").await?;
        info!("User updated successfully");
        Ok(())
    }

    pub async fn delete(&self, phone: &str) -> Result<()> {
        let response = self.client.delete(self.user_url(phone)).send().await?;

        ensure_ok(response, "Failed to delete user").await?;
        info!("User deleted successfully");
        Ok(())
    }
}

async fn ensure_ok(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    bail!("{context}: {status} {body}")
}
