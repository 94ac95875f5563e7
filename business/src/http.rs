//! Platform-abstracted HTTP transport with Send-safe futures.
//!
//! On native targets requests go straight through `reqwest`. On WASM,
//! `reqwest::Response` is not `Send`, so the request runs on the JS thread via
//! `wasm_bindgen_futures::spawn_local` and the result comes back over a
//! `flume` channel.

/// Methods the list client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// Status, headers and body of a finished request, detached from `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    /// Lowercase header names.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure: the request produced no response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Sends `body` as `application/json`.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub async fn send(self) -> HttpResult<Response> {
        log::debug!("{:?} {}", self.method, self.url);

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.execute().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);
            wasm_bindgen_futures::spawn_local(async move {
                // Receiver may be gone if the caller was dropped.
                let _ = tx.send_async(self.execute().await).await;
            });
            rx.recv_async()
                .await
                .map_err(|_err| HttpError::new("Request cancelled"))?
        }
    }

    async fn execute(self) -> HttpResult<Response> {
        let client = reqwest::Client::new();
        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Patch => client.patch(&self.url),
            Method::Delete => client.delete(&self.url),
        };
        if let Some(body) = &self.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        let ok = Response {
            status: 204,
            ..Response::default()
        };
        let conflict = Response {
            status: 409,
            ..Response::default()
        };

        assert!(ok.is_success());
        assert!(!conflict.is_success());
    }

    #[test]
    fn test_response_json() {
        let response = Response {
            status: 200,
            body: br#"{"message":"ok"}"#.to_vec(),
            ..Response::default()
        };

        let value: serde_json::Value = response.json().expect("body should decode");
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_request_keeps_method_and_url() {
        let request = Request::delete("https://example.com/api/assets/1");

        assert_eq!(request.method(), Method::Delete);
        assert_eq!(request.url(), "https://example.com/api/assets/1");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = Response {
            status: 200,
            headers: vec![(
                "content-disposition".to_owned(),
                "attachment; filename=report.xlsx".to_owned(),
            )],
            ..Response::default()
        };

        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=report.xlsx")
        );
        assert_eq!(response.header("content-type"), None);
    }

    #[test]
    fn test_patch_carries_json_body() {
        let request = Request::patch("https://example.com/api/asset-returns/7")
            .json(serde_json::json!({ "state": "COMPLETED" }));

        assert_eq!(request.method(), Method::Patch);
        assert_eq!(
            request.body(),
            Some(&serde_json::json!({ "state": "COMPLETED" }))
        );
    }
}
