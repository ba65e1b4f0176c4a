use std::time::Duration;

/// Timeout durations for outbound calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Whole-request timeout for REST calls (default: 10 seconds)
    pub http_request: Duration,

    /// TCP/TLS connect timeout (default: 5 seconds)
    pub http_connect: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            http_request: Duration::from_secs(10),
            http_connect: Duration::from_secs(5),
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set request timeout
    pub fn with_http_request(mut self, duration: Duration) -> Self {
        self.http_request = duration;
        self
    }

    /// Builder pattern: set connect timeout
    pub fn with_http_connect(mut self, duration: Duration) -> Self {
        self.http_connect = duration;
        self
    }
}
