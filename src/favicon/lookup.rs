use reqwest::StatusCode;
use serde::Deserialize;

use super::FetchError;
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    pub icons: Vec<LookupIcon>,
}

#[derive(Debug, Deserialize)]
pub struct LookupIcon {
    pub src: String,
    #[serde(default)]
    pub sizes: Option<String>,
    #[serde(default, rename = "type")]
    pub mime: Option<String>,
}

impl LookupIcon {
    /// What the service claims about the icon, e.g. `32x32 image/png`.
    pub fn advertised(&self) -> String {
        let parts: Vec<&str> = [self.sizes.as_deref(), self.mime.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "unadvertised".to_string()
        } else {
            parts.join(" ")
        }
    }
}

pub fn lookup_url(lookup_host: &str, host: &str) -> String {
    format!("https://{lookup_host}/api/grab/{host}?pretty=true")
}

/// Ask the lookup service which icons it knows for `host`.
///
/// `Ok(None)` means the service answered with something other than 200: it
/// responded, it just has nothing for us. Transport and JSON failures are errors.
pub fn grab(
    client: &dyn HttpClient,
    lookup_host: &str,
    host: &str,
) -> Result<Option<Vec<LookupIcon>>, FetchError> {
    let url = lookup_url(lookup_host, host);
    let resp = client.get(&url)?;

    if resp.status != StatusCode::OK {
        log::warn!("{url}: lookup answered {}", resp.status);
        return Ok(None);
    }

    let parsed: LookupResponse = serde_json::from_slice(&resp.body)
        .map_err(|err| FetchError::Decode(format!("lookup response: {err}")))?;

    log::debug!("{url}: {} icons listed", parsed.icons.len());
    Ok(Some(parsed.icons))
}
