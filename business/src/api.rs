//! List API client.
//!
//! Fetches pages of a resource through the [`RequestCache`] and keeps the
//! cache coherent after writes. No UI plumbing lives here; pages map the
//! results into their own state.

use serde::de::DeserializeOwned;

use crate::cache::RequestCache;
use crate::config::BusinessConfig;
use crate::download::Download;
use crate::error::{ApiError, ApiResult};
use crate::http::{Request, Response};
use crate::page::{ErrorBody, ExpectedResponse, Page};
use crate::query::{ListQuery, encode_pairs};

#[derive(Debug, Clone)]
pub struct ListClient {
    config: BusinessConfig,
    cache: RequestCache,
}

impl ListClient {
    pub fn new(config: BusinessConfig, cache: RequestCache) -> Self {
        Self { config, cache }
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.api_url(), endpoint.trim_start_matches('/'))
    }

    /// Cache key of the page `fetch_page` loads for `query`.
    pub fn page_key(endpoint: &str, query: &ListQuery) -> String {
        RequestCache::key(endpoint, &query.api_query_string())
    }

    /// GET `/{endpoint}?{query}`, served from the cache when possible.
    pub async fn fetch_page<T>(&self, endpoint: &str, query: &ListQuery) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = Self::page_key(endpoint, query);
        if let Some(page) = self.cache.get::<Page<T>>(&key) {
            log::debug!("Cache hit for {key}");
            return Ok(page);
        }
        self.refetch_page(endpoint, query).await
    }

    /// GET `/{endpoint}?{query}`, bypassing and then refreshing the cache.
    pub async fn refetch_page<T>(&self, endpoint: &str, query: &ListQuery) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let api_query = query.api_query_string();
        let key = RequestCache::key(endpoint, &api_query);
        let url = format!("{}?{api_query}", self.endpoint_url(endpoint));

        let response = Request::get(url).send().await?;
        let envelope: ExpectedResponse<Page<T>> =
            decode(&response, "ExpectedResponse<Page>")?;

        log::debug!(
            "Fetched {} rows of {endpoint} (page {}/{})",
            envelope.data.content.len(),
            envelope.data.current_page(),
            envelope.data.total_pages()
        );
        self.cache.insert(key, envelope.data.clone());
        Ok(envelope.data)
    }

    /// GET an unpaged list such as `/categories`, served from the cache
    /// when possible.
    pub async fn fetch_list<T>(&self, endpoint: &str) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = RequestCache::key(endpoint, "");
        if let Some(items) = self.cache.get::<Vec<T>>(&key) {
            log::debug!("Cache hit for {key}");
            return Ok(items);
        }

        let response = Request::get(self.endpoint_url(endpoint)).send().await?;
        let envelope: ExpectedResponse<Vec<T>> = decode(&response, "ExpectedResponse<Vec>")?;
        log::debug!("Fetched {} items of {endpoint}", envelope.data.len());
        self.cache.insert(key, envelope.data.clone());
        Ok(envelope.data)
    }

    /// DELETE `/{endpoint}/{id}` and drop every cached page of `endpoint`.
    pub async fn delete(&self, endpoint: &str, id: &str) -> ApiResult<()> {
        let url = format!("{}/{}", self.endpoint_url(endpoint), urlencoding::encode(id));
        let response = Request::delete(url).send().await?;
        check_status(&response)?;
        self.cache.invalidate_prefix(endpoint);
        Ok(())
    }

    /// POST a JSON body to `path`. Callers invalidate what the write touched.
    pub async fn post(&self, path: &str, body: serde_json::Value) -> ApiResult<()> {
        let response = Request::post(self.endpoint_url(path)).json(body).send().await?;
        check_status(&response)
    }

    /// PATCH a JSON body to `path`. Callers invalidate what the write touched.
    pub async fn patch(&self, path: &str, body: serde_json::Value) -> ApiResult<()> {
        let response = Request::patch(self.endpoint_url(path)).json(body).send().await?;
        check_status(&response)
    }

    /// GET a file from `path`. Downloads bypass the cache.
    pub async fn download(&self, path: &str, params: &[(String, String)]) -> ApiResult<Download> {
        let mut url = self.endpoint_url(path);
        if !params.is_empty() {
            url = format!("{url}?{}", encode_pairs(params));
        }
        let response = Request::get(url).send().await?;
        check_status(&response)?;

        let download = Download::from_response(response);
        log::info!("Downloaded {} ({} bytes)", download.file_name, download.bytes.len());
        Ok(download)
    }
}

/// Joins path segments, percent-encoding each one.
pub fn resource_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}

fn check_status(response: &Response) -> ApiResult<()> {
    if response.is_success() {
        Ok(())
    } else {
        let body = response.json::<ErrorBody>().ok();
        let err = ApiError::from_status(response.status, body);
        log::warn!("{err}");
        Err(err)
    }
}

fn decode<T: DeserializeOwned>(response: &Response, what: &'static str) -> ApiResult<T> {
    check_status(response)?;
    response.json().map_err(|e| ApiError::Decode {
        what,
        reason: e.to_string(),
    })
}
