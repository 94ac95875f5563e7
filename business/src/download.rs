//! Files served by export endpoints.

use crate::http::Response;

const FALLBACK_FILE_NAME: &str = "downloaded-file";

/// A downloaded file, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Download {
    pub(crate) fn from_response(response: Response) -> Self {
        let file_name = response
            .header("content-disposition")
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_owned());
        let content_type = response.header("content-type").map(str::to_owned);

        Self {
            file_name,
            content_type,
            bytes: response.body,
        }
    }
}

/// File name of a `Content-Disposition` header.
///
/// Prefers the RFC 5987 `filename*=` form over the plain `filename=` one.
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.rsplit("''").next().unwrap_or(value);
                if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"'))
                    && !decoded.is_empty()
                {
                    return Some(decoded.into_owned());
                }
            }
            "filename" => plain = Some(value.trim().trim_matches('"').to_owned()),
            _ => {}
        }
    }
    plain.filter(|name| !name.is_empty())
}
