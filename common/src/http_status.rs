//! HTTP status classification shared by the executor and the protocol clients.

/// HTTP status code.
///
/// Stored as the raw number so errors can carry it without depending on an
/// HTTP crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Anything in `[300, 400)`, including 304.
    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// 401 and 403: the server understood us and refused the credentials.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.0, 401 | 403)
    }

    /// 404 and 410: the resource is not there (any more).
    pub fn is_gone(&self) -> bool {
        matches!(self.0, 404 | 410)
    }

    /// Specific codes that indicate transient failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self.0, 502 | 503 | 504 | 429)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpStatusCode;

    #[test]
    fn given_304_when_classified_then_counts_as_redirection() {
        assert!(HttpStatusCode(304).is_redirection());
        assert!(HttpStatusCode(399).is_redirection());
        assert!(!HttpStatusCode(400).is_redirection());
        assert!(!HttpStatusCode(299).is_redirection());
    }

    #[test]
    fn given_auth_statuses_when_classified_then_only_401_and_403_are_rejections() {
        assert!(HttpStatusCode(401).is_auth_rejection());
        assert!(HttpStatusCode(403).is_auth_rejection());
        assert!(!HttpStatusCode(404).is_auth_rejection());
        assert!(HttpStatusCode(410).is_gone());
    }
}
