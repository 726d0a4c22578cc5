//! Client configuration

/// Configuration for connecting to the hosted backend.
///
/// One endpoint serves both collaborators: the data store under
/// `/rest/v1` and the session provider under `/auth/v1`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub endpoint: String,

    /// API key sent with every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Base URL of the relational REST API
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.endpoint.trim_end_matches('/'))
    }

    /// Base URL of the auth API
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.endpoint.trim_end_matches('/'))
    }
}
