//! RestStore - AnalysisStore over the PostgREST HTTP API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use analyses_core::{AnalysisRecord, AnalysisStatus, AnalysisStore, StoreError, StoreResult};

use crate::config::RestStoreConfig;

/// PostgREST code for "singular response requested, 0 or >1 rows returned"
pub const NO_SINGLE_ROW_CODE: &str = "PGRST116";

/// Media type asking PostgREST for a single JSON object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Listing order: newest first, undated rows last, id as the tie-break
const LIST_ORDER: &str = "created_at.desc.nullslast,id.asc";

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// `AnalysisStore` backed by a PostgREST endpoint
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    table_url: Url,
}

impl RestStore {
    /// Build the store client.
    ///
    /// Fails when the base URL cannot be parsed or the key is not a valid
    /// header value. No request is made here.
    pub fn new(config: RestStoreConfig) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(&config.service_key)
            .map_err(|e| StoreError::Internal(format!("Invalid service key: {}", e)))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|e| StoreError::Internal(format!("Invalid service key: {}", e)))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let mut table_url = Url::parse(&config.base_url).map_err(|e| {
            StoreError::Internal(format!("Invalid store URL '{}': {}", config.base_url, e))
        })?;
        table_url
            .path_segments_mut()
            .map_err(|_| {
                StoreError::Internal(format!("Store URL cannot be a base: {}", config.base_url))
            })?
            .pop_if_empty()
            .extend(["rest", "v1", config.table.as_str()]);

        Ok(Self { client, table_url })
    }

    /// Collection endpoint (`{base}/rest/v1/{table}`)
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn list_url(&self, status: &AnalysisStatus) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("status", &format!("eq.{}", status))
            .append_pair("order", LIST_ORDER);
        url
    }

    fn delete_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }
}

#[async_trait]
impl AnalysisStore for RestStore {
    fn name(&self) -> &str {
        "postgrest"
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: &AnalysisStatus) -> StoreResult<Vec<AnalysisRecord>> {
        let url = self.list_url(status);
        debug!("Listing analyses from {}", url);

        let response = self.client.get(url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await.map_err(transport)?;
        let rows: Vec<AnalysisRecord> =
            serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!(count = rows.len(), "Listed analyses");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn delete_single(&self, id: &str) -> StoreResult<Option<serde_json::Value>> {
        let url = self.delete_url(id);
        debug!("Deleting analysis via {}", url);

        let response = self
            .client
            .delete(url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await.map_err(transport)?;
        decode_deleted_row(&body)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transport(format!("request timed out: {}", err))
    } else {
        StoreError::Transport(err.to_string())
    }
}

/// Turn a non-2xx PostgREST response into a `StoreError`
async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return transport(e),
    };
    classify_error(status, &body)
}

fn classify_error(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) if err.code.as_deref() == Some(NO_SINGLE_ROW_CODE) => StoreError::NoSingleRow {
            message: err
                .details
                .or(err.message)
                .unwrap_or_else(|| format!("HTTP {}", status)),
        },
        Ok(err) => StoreError::Query {
            status: status.as_u16(),
            code: err.code,
            message: err.message.unwrap_or_else(|| format!("HTTP {}", status)),
            details: err.details,
            hint: err.hint,
        },
        Err(_) => StoreError::query(status.as_u16(), format!("HTTP {}", status)),
    }
}

/// Decode the representation returned by a single-row delete.
///
/// An empty body, JSON `null` or `[]` means the store returned no row. The
/// row itself is not interpreted beyond being a JSON object.
fn decode_deleted_row(body: &[u8]) -> StoreResult<Option<serde_json::Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    let value = match value {
        serde_json::Value::Null => return Ok(None),
        // Proxies that drop the Accept header yield an array
        serde_json::Value::Array(mut rows) => match rows.len() {
            0 => return Ok(None),
            1 => rows.remove(0),
            n => {
                return Err(StoreError::Decode(format!(
                    "expected a single deleted row, got {}",
                    n
                )))
            }
        },
        other => other,
    };

    if value.is_object() {
        Ok(Some(value))
    } else {
        Err(StoreError::Decode(format!(
            "expected the deleted row as an object, got {}",
            value
        )))
    }
}
