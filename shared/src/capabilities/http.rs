use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const MAX_TIMEOUT_MS: u64 = 300_000;
pub const MAX_HEADER_NAME_LENGTH: usize = 256;
pub const MAX_HEADER_VALUE_LENGTH: usize = 8192;
pub const MAX_HEADERS_COUNT: usize = 100;

/// An absolute `http`/`https` URL with a host and no embedded credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl {
    url: String,
    scheme: String,
    host: String,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();

        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl {
                url,
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(&url),
                reason: format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            });
        }

        let parsed = Url::parse(url.trim()).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(&url),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(&url),
                reason: format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            });
        }

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_lowercase(),
            _ => {
                return Err(HttpError::InvalidUrl {
                    url: Self::truncate_url(&url),
                    reason: "URL must have a host".to_string(),
                })
            }
        };

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(&url),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(Self {
            url: parsed.to_string(),
            scheme,
            host,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Appends an absolute path to this URL, keeping any base path prefix.
    pub fn join_path(&self, path: &str) -> Result<Self, HttpError> {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Self::new(format!("{base}/{path}"))
    }

    fn truncate_url(url: &str) -> String {
        if url.len() <= 100 {
            url.to_string()
        } else {
            let mut end = 100;
            while !url.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &url[..end])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HttpHeaders {
    headers: Vec<(String, String)>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), HttpError> {
        if self.headers.len() >= MAX_HEADERS_COUNT {
            return Err(HttpError::TooManyHeaders {
                count: self.headers.len(),
                max: MAX_HEADERS_COUNT,
            });
        }

        let name = name.into();
        let value = value.into();

        Self::validate_header_name(&name)?;
        Self::validate_header_value(&name, &value)?;

        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value));

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn validate_header_name(name: &str) -> Result<(), HttpError> {
        if name.is_empty() {
            return Err(HttpError::InvalidHeader {
                name: String::new(),
                reason: "header name cannot be empty".to_string(),
            });
        }

        if name.len() > MAX_HEADER_NAME_LENGTH {
            return Err(HttpError::InvalidHeader {
                name: name.chars().take(50).collect(),
                reason: format!(
                    "header name exceeds maximum length of {MAX_HEADER_NAME_LENGTH} bytes"
                ),
            });
        }

        if let Some(c) = name
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(HttpError::InvalidHeader {
                name: name.to_string(),
                reason: format!("invalid character '{c}' in header name"),
            });
        }

        let lower = name.to_ascii_lowercase();
        if lower == "host" || lower == "content-length" || lower == "transfer-encoding" {
            return Err(HttpError::InvalidHeader {
                name: name.to_string(),
                reason: "this header is managed automatically".to_string(),
            });
        }

        Ok(())
    }

    fn validate_header_value(name: &str, value: &str) -> Result<(), HttpError> {
        if value.len() > MAX_HEADER_VALUE_LENGTH {
            return Err(HttpError::InvalidHeader {
                name: name.to_string(),
                reason: format!(
                    "header value exceeds maximum length of {MAX_HEADER_VALUE_LENGTH} bytes"
                ),
            });
        }

        if value.chars().any(|c| c == '\r' || c == '\n' || c == '\0') {
            return Err(HttpError::InvalidHeader {
                name: name.to_string(),
                reason: "header value contains invalid characters (CR, LF, or NULL)".to_string(),
            });
        }

        Ok(())
    }
}

/// Methods the core issues. The profile API only takes `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

/// A fully described request for the shell to execute.
///
/// The shell must enforce `timeout_ms` and report an expired request as
/// [`HttpError::Timeout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    method: HttpMethod,
    url: ValidatedUrl,
    headers: HttpHeaders,
    body: Option<Vec<u8>>,
    timeout_ms: u64,
    request_id: String,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: ValidatedUrl) -> Self {
        Self {
            method,
            url,
            headers: HttpHeaders::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, HttpError> {
        self.headers.insert(name, value)?;
        Ok(self)
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, HttpError> {
        let body = serde_json::to_vec(value).map_err(|e| HttpError::SerializationError {
            message: e.to_string(),
        })?;

        if body.len() > MAX_REQUEST_BODY_SIZE {
            return Err(HttpError::BodyTooLarge {
                size: body.len(),
                max: MAX_REQUEST_BODY_SIZE,
            });
        }

        self.headers.insert("Content-Type", "application/json")?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, HttpError> {
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        if ms == 0 {
            return Err(HttpError::InvalidRequest {
                reason: "timeout cannot be zero".to_string(),
            });
        }
        if ms > MAX_TIMEOUT_MS {
            return Err(HttpError::InvalidRequest {
                reason: format!("timeout exceeds maximum of {MAX_TIMEOUT_MS}ms"),
            });
        }
        self.timeout_ms = ms;
        Ok(self)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &ValidatedUrl {
        &self.url
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpOperation {
    Execute(HttpRequest),
}

impl Operation for HttpOperation {
    type Output = HttpResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("too many headers: {count} exceeds maximum of {max}")]
    TooManyHeaders { count: usize, max: usize },

    #[error("request body too large: {size} bytes exceeds maximum of {max} bytes")]
    BodyTooLarge { size: usize, max: usize },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("DNS resolution failed for {host}: {message}")]
    DnsError { host: String, message: String },

    #[error("connection failed to {host}: {message}")]
    ConnectionError { host: String, message: String },

    #[error("TLS error for {host}: {message}")]
    TlsError { host: String, message: String },

    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64, request_id: String },

    #[error("request cancelled")]
    Cancelled { request_id: String },

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String, request_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    headers: HttpHeaders,
    body: Vec<u8>,
    request_id: String,
    duration_ms: u64,
}

impl HttpResponse {
    pub fn new(
        status: u16,
        headers: HttpHeaders,
        body: Vec<u8>,
        request_id: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            request_id,
            duration_ms,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::InvalidResponse {
            reason: format!("failed to parse JSON: {e}"),
            request_id: self.request_id.clone(),
        })
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

pub type HttpResult = Result<HttpResponse, HttpError>;

/// Shell-executed HTTP. One request per call, no retries.
pub struct Http<E> {
    context: CapabilityContext<HttpOperation, E>,
}

impl<Ev> Capability<Ev> for Http<Ev> {
    type Operation = HttpOperation;
    type MappedSelf<MappedEv> = Http<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Http::new(self.context.map_event(f))
    }
}

impl<E> Http<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<HttpOperation, E>) -> Self {
        Self { context }
    }

    pub fn send<F>(&self, request: HttpRequest, callback: F)
    where
        F: FnOnce(HttpResult) -> E + Send + 'static,
        E: Send,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(HttpOperation::Execute(request))
                .await;
            ctx.update_app(callback(result));
        });
    }
}
