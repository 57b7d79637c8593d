use reqwest::Method;

use super::ResourceClient;
use crate::errors::ApiError;
use crate::models::{Asset, AssetHistory, IssueRequest, RecordId, ReturnRequest, ScrapRequest};

const ISSUE_PATH: &str = "assets/issue";
const RETURN_PATH: &str = "assets/return";
const SCRAP_PATH: &str = "assets/scrap";

/// Custody operations. Each is a single request; the server updates the asset
/// and appends the transaction as one unit.
impl ResourceClient<'_, Asset> {
    /// Fetches the asset together with its transaction log.
    pub async fn history(&self, id: RecordId) -> Result<AssetHistory, ApiError> {
        let path = format!("assets/{id}/history");
        let req = self.client.request(Method::GET, &path);
        self.client.send_json(Method::GET, &path, req).await
    }

    pub async fn issue(&self, body: &IssueRequest) -> Result<(), ApiError> {
        let req = self.client.request(Method::POST, ISSUE_PATH).json(body);
        self.client.send_empty(Method::POST, ISSUE_PATH, req).await
    }

    pub async fn return_asset(&self, body: &ReturnRequest) -> Result<(), ApiError> {
        let req = self.client.request(Method::POST, RETURN_PATH).json(body);
        self.client.send_empty(Method::POST, RETURN_PATH, req).await
    }

    pub async fn scrap(&self, body: &ScrapRequest) -> Result<(), ApiError> {
        let req = self.client.request(Method::POST, SCRAP_PATH).json(body);
        self.client.send_empty(Method::POST, SCRAP_PATH, req).await
    }
}
