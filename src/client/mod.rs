//! HTTP client for the asset registry API.
//!
//! One [`RegistryClient`] owns the connection pool; typed
//! [`ResourceClient`]s borrow it per collection:
//!
//! ```ignore
//! let client = RegistryClient::new("http://localhost:5000/api")?;
//! let laptops = client.assets().list(&AssetFilter::default()).await?;
//! ```
//!
//! Any non-2xx response, transport error, or undecodable body is returned as
//! an [`ApiError`]. Nothing is retried or cached.

mod assets;

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::models::{
    Asset, AssetFields, AssetFilter, Category, CategoryFields, CategoryFilter, Employee,
    EmployeeFields, EmployeeFilter, RecordId,
};

/// A registry collection reachable at `{base_url}/{COLLECTION}`.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Exact-match query parameters accepted by `GET /{COLLECTION}`.
    type Filter: Serialize + Default + Send + Sync;
    /// Body of `POST` and `PUT`.
    type Fields: Serialize + Send + Sync;
}

/// Collections that expose `DELETE /{COLLECTION}/:id`.
pub trait Deletable: Resource {}

impl Resource for Employee {
    const COLLECTION: &'static str = "employees";
    type Filter = EmployeeFilter;
    type Fields = EmployeeFields;
}

impl Deletable for Employee {}

impl Resource for Category {
    const COLLECTION: &'static str = "categories";
    type Filter = CategoryFilter;
    type Fields = CategoryFields;
}

impl Deletable for Category {}

impl Resource for Asset {
    const COLLECTION: &'static str = "assets";
    type Filter = AssetFilter;
    type Fields = AssetFields;
}

#[derive(Clone, Debug)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from configuration. A timeout is only applied when
    /// one is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_http(&config.api_base_url, builder.build()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn employees(&self) -> ResourceClient<'_, Employee> {
        ResourceClient::new(self)
    }

    pub fn categories(&self) -> ResourceClient<'_, Category> {
        ResourceClient::new(self)
    }

    pub fn assets(&self) -> ResourceClient<'_, Asset> {
        ResourceClient::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Sends the request and decodes a JSON body.
    async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<R, ApiError> {
        let resp = self.dispatch(method, path, builder).await?;
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }

    /// Sends the request and discards whatever body comes back.
    async fn send_empty(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<(), ApiError> {
        self.dispatch(method, path, builder).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        debug!(%method, path, "registry request");
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "registry request rejected");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        debug!(%method, path, status = status.as_u16(), "registry response");
        Ok(resp)
    }
}

/// Type-safe CRUD access to one collection.
pub struct ResourceClient<'a, T: Resource> {
    client: &'a RegistryClient,
    _marker: PhantomData<T>,
}

impl<'a, T: Resource> ResourceClient<'a, T> {
    fn new(client: &'a RegistryClient) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    fn item_path(id: RecordId) -> String {
        format!("{}/{}", T::COLLECTION, id)
    }

    /// Lists records matching `filter`, in server order.
    pub async fn list(&self, filter: &T::Filter) -> Result<Vec<T>, ApiError> {
        let req = self.client.request(Method::GET, T::COLLECTION).query(filter);
        self.client.send_json(Method::GET, T::COLLECTION, req).await
    }

    pub async fn get(&self, id: RecordId) -> Result<T, ApiError> {
        let path = Self::item_path(id);
        let req = self.client.request(Method::GET, &path);
        self.client.send_json(Method::GET, &path, req).await
    }

    pub async fn create(&self, fields: &T::Fields) -> Result<T, ApiError> {
        let req = self.client.request(Method::POST, T::COLLECTION).json(fields);
        self.client.send_json(Method::POST, T::COLLECTION, req).await
    }

    pub async fn update(&self, id: RecordId, fields: &T::Fields) -> Result<T, ApiError> {
        let path = Self::item_path(id);
        let req = self.client.request(Method::PUT, &path).json(fields);
        self.client.send_json(Method::PUT, &path, req).await
    }
}

impl<T: Deletable> ResourceClient<'_, T> {
    pub async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let path = Self::item_path(id);
        let req = self.client.request(Method::DELETE, &path);
        self.client.send_empty(Method::DELETE, &path, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = RegistryClient::new("http://registry.local/api/").unwrap();
        assert_eq!(client.base_url(), "http://registry.local/api");
        assert_eq!(client.url("/assets/issue"), "http://registry.local/api/assets/issue");
        assert_eq!(ResourceClient::<Asset>::item_path(12), "assets/12");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            RegistryClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
