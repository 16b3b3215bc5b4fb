//! HTTP client for the catalog endpoint.

use super::error::{CatalogError, ErrorBody};
use super::query::{CatalogPage, CatalogQuery};
use super::types::Course;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const COURSE_PATH: &str = "api/course";
const COLLECTION_PATH: &str = "api/collection";

/// Anything that can answer a catalog query asynchronously.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch(
        &self,
        query: CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, CatalogError>> + Send;
}

#[derive(Deserialize)]
struct CollectionBody {
    documents: Vec<Course>,
}

/// Client for a running catalog server.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        // Url::join drops the last path segment unless it ends with a slash
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
        })
    }

    /// Builds the request URL for a query.
    pub fn course_url(&self, query: &CatalogQuery) -> Result<Url, CatalogError> {
        let mut url = self.base_url.join(COURSE_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", &query.q)
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());
        Ok(url)
    }

    /// Fetches one page of results.
    pub async fn fetch_page(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        let url = self.course_url(query)?;
        debug!(url = %url, "Fetching catalog page");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        Ok(response.json::<CatalogPage>().await?)
    }

    /// Fetches the whole collection.
    pub async fn fetch_collection(&self) -> Result<Vec<Course>, CatalogError> {
        let url = self.base_url.join(COLLECTION_PATH)?;
        debug!(url = %url, "Fetching catalog collection");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        Ok(response.json::<CollectionBody>().await?.documents)
    }

    async fn service_error(response: reqwest::Response) -> CatalogError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => CatalogError::Service {
                status: status.as_u16(),
                message: body.error,
                details: body.details,
                timestamp: body.timestamp,
            },
            Err(_) => {
                warn!(status = %status, "Catalog endpoint returned a non-JSON error body");
                CatalogError::Service {
                    status: status.as_u16(),
                    message: format!("Catalog request failed with status {}", status),
                    details: text,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                }
            }
        }
    }
}

impl CatalogSource for CatalogClient {
    async fn fetch(&self, query: CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.fetch_page(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_url() {
        let client = CatalogClient::new("http://localhost:3000").unwrap();
        let url = client
            .course_url(&CatalogQuery::new("資料 結構", 2, 20))
            .unwrap();

        assert_eq!(url.path(), "/api/course");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "資料 結構".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_with_prefix() {
        let client = CatalogClient::new("http://localhost:3000/helper").unwrap();
        let url = client.course_url(&CatalogQuery::default()).unwrap();
        assert_eq!(url.path(), "/helper/api/course");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            CatalogClient::new("not a url"),
            Err(CatalogError::UrlError { .. })
        ));
    }
}
