// HTTP Repository - the Budgets page talks to the mock API through this
//
// Blocking reqwest client; the UI loop is synchronous and draws its
// Loading frame before each call.

use crate::config::ClientConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};
use crate::store::Repository;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::marker::PhantomData;
use tracing::debug;

pub struct HttpStore<T> {
    client: Client,
    base_url: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> HttpStore<T> {
    /// Client for `<api_url>/api/<collection>`
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(network)?;

        Ok(HttpStore {
            client,
            base_url: format!("{}/api/{}", config.api_url, T::KIND.collection()),
            _record: PhantomData,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

fn network(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

/// Any non-2xx status becomes a Network error
fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Network(format!(
            "HTTP error! status: {}",
            status.as_u16()
        )))
    }
}

impl<T: Record> Repository<T> for HttpStore<T> {
    fn list(&self) -> StoreResult<Vec<T>> {
        debug!(url = %self.base_url, "GET");
        let response = self.client.get(&self.base_url).send().map_err(network)?;
        check_status(response)?.json().map_err(network)
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<T>> {
        let response = self.client.get(self.item_url(id)).send().map_err(network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response)?.json().map(Some).map_err(network)
    }

    fn add(&mut self, record: T) -> StoreResult<T> {
        debug!(url = %self.base_url, "POST");
        let response = self
            .client
            .post(&self.base_url)
            .json(&record)
            .send()
            .map_err(network)?;
        check_status(response)?.json().map_err(network)
    }

    fn update(&mut self, record: T) -> StoreResult<Option<T>> {
        let url = self.item_url(record.id());
        debug!(url = %url, "PUT");
        let response = self.client.put(&url).json(&record).send().map_err(network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response)?.json().map(Some).map_err(network)
    }

    fn remove(&mut self, id: RecordId) -> StoreResult<()> {
        let url = self.item_url(id);
        debug!(url = %url, "DELETE");
        let response = self.client.delete(&url).send().map_err(network)?;
        check_status(response).map(|_| ())
    }
}
