use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never completed: DNS, connect, TLS or timeout failures.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider error from {url}: HTTP {status}: {body}")]
    Provider {
        url: String,
        status: u16,
        body: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Message suitable for showing next to a retry button.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "No internet connection. Please check your network and try again.",
            Self::Provider { status: 429, .. } => "Too many requests. Please try again in a moment.",
            Self::Provider { status: 401, .. } => {
                "Unable to access the book service. Please try again later."
            }
            _ => "Something went wrong while searching. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(status: u16) -> CatalogError {
        CatalogError::Provider {
            url: "https://books.example/volumes".to_string(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn user_messages_follow_status() {
        assert!(provider(429).user_message().starts_with("Too many requests"));
        assert!(provider(401).user_message().starts_with("Unable to access"));
        assert!(provider(500).user_message().starts_with("Something went wrong"));
        assert!(
            CatalogError::Parse("bad".into())
                .user_message()
                .starts_with("Something went wrong")
        );
    }

    #[test]
    fn status_only_for_provider_errors() {
        assert_eq!(provider(503).status(), Some(503));
        assert_eq!(CatalogError::Parse("x".into()).status(), None);
    }
}
