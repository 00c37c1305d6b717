use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_LIST_MODELS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model, ModelListResponse};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    credential: Option<Credential>,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The environment is not consulted; credentials come from
    /// [`CredentialStore`](crate::CredentialStore). A client without a
    /// credential can still be built, but must be configured before making
    /// requests.
    pub fn new(credential: Option<Credential>) -> Result<Self> {
        Self::with_options(credential, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        credential: Option<Credential>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        Ok(Self {
            credential,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Replace the credential used for subsequent requests.
    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| Error::authentication("No API key configured"))?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(credential.expose())
            .map_err(|_| Error::validation("API key contains invalid characters"))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // Google APIs wrap errors as {"error": {code, message, status, details}}
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
            #[serde(default)]
            details: Vec<ErrorInfo>,
        }

        #[derive(Deserialize)]
        struct ErrorInfo {
            reason: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let error_status = parsed_error.as_ref().and_then(|e| e.status.clone());
        let mut error_message = parsed_error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());
        // The reason (e.g. API_KEY_INVALID) is the stable signal; keep it in the message.
        let reasons: Vec<&str> = parsed_error
            .as_ref()
            .map(|e| {
                e.details
                    .iter()
                    .filter_map(|d| d.reason.as_deref())
                    .collect()
            })
            .unwrap_or_default();
        if !reasons.is_empty() {
            error_message = format!("{} [{}]", error_message, reasons.join(", "));
        }

        match status_code {
            400 => Error::bad_request(error_message),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_status, error_message),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        let headers = self.default_headers()?;
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::decode(response).await
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
        body: &GenerateContentRequest,
    ) -> Result<T> {
        let headers = self.default_headers()?;
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    fn record<T>(&self, started: Instant, result: &Result<T>) {
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());
        if let Err(err) = result {
            CLIENT_REQUEST_ERRORS.click();
            if let Some(logger) = &self.logger {
                logger.log_error(err);
            }
        }
    }

    /// List the models available to the configured credential.
    pub async fn list_models(&self) -> Result<ModelListResponse> {
        let url = self.base_url.join("models")?;
        CLIENT_REQUESTS.click();
        CLIENT_LIST_MODELS.click();
        if let Some(logger) = &self.logger {
            logger.log_request("models.list", "models");
        }

        let started = Instant::now();
        let result = self.get_json::<ModelListResponse>(url).await;
        self.record(started, &result);
        if let (Ok(response), Some(logger)) = (&result, &self.logger) {
            logger.log_model_list(response, started.elapsed());
        }
        result
    }

    /// Generate the next turn of a conversation.
    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self
            .base_url
            .join(&format!("models/{}:generateContent", model.id()))?;
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request("generateContent", model.id());
        }

        let started = Instant::now();
        let result = self
            .post_json::<GenerateContentResponse>(url, request)
            .await;
        self.record(started, &result);
        if let (Ok(response), Some(logger)) = (&result, &self.logger) {
            logger.log_response(response, started.elapsed());
        }
        result
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut base_url = base_url.to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    Ok(Url::parse(&base_url)?)
}
