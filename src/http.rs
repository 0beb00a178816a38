use reqwest::StatusCode;
use std::{error::Error, time::Duration};

use crate::config::FaviconConfig;
use crate::favicon::FetchError;

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Blocking GET transport used by favicon discovery.
///
/// Transport failures are errors; any status the server answers with is a
/// response, and it is up to the caller to decide what a 404 means.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(config: &FaviconConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.is_empty()) {
            log::debug!("using proxy {proxy:#?}");
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|err| FetchError::Network(format!("invalid proxy: {}", get_error(&err))))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|err| FetchError::Network(get_error(&err)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let url = if url.starts_with("//") {
            format!("https:{url}")
        } else {
            url.to_string()
        };

        log::debug!("{url}: requesting");

        let resp = self.client.get(&url).send().map_err(|err| {
            log::debug!("{url}: {err}");
            FetchError::Network(get_error(&err))
        })?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!("{url}: {status}");
        }

        let body = resp.bytes().map_err(|err| {
            log::debug!("{url}: body read failed, timeout={}", err.is_timeout());
            FetchError::Network(get_error(&err))
        })?;

        Ok(HttpResponse {
            status,
            body: body.into(),
        })
    }
}

/// Innermost useful message of a reqwest error chain.
fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}
