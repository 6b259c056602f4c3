//! Error types for the Prisma Cloud client.

use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while talking to the platform.
///
/// Each variant carries enough context for a one-line message on the
/// terminal. The binary maps all of them to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The login payload file could not be found.
    #[error("credentials file not found: {}", .path.display())]
    CredentialsMissing { path: PathBuf },

    /// The platform refused the credentials or the token.
    #[error("authentication rejected by {endpoint} (HTTP {status})")]
    AuthenticationRejected { endpoint: String, status: u16 },

    /// The request never got a response.
    #[error("could not reach {url}: {source}")]
    NetworkUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body did not have the expected shape.
    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The package search was scoped to a repository the platform doesn't know.
    #[error("repository not found: {0}")]
    RepoNotFound(String),

    /// Any other non-2xx status.
    #[error("{endpoint} returned HTTP {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("must provide value to --repo_id when using the --code_issues flag")]
    MissingRepoId,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_repo_id_message() {
        let msg = Error::MissingRepoId.to_string();
        assert!(msg.contains("must provide value to --repo_id"));
    }

    #[test]
    fn test_credentials_missing_names_path() {
        let err = Error::CredentialsMissing {
            path: PathBuf::from("access-key-credentials.json"),
        };
        assert_eq!(
            err.to_string(),
            "credentials file not found: access-key-credentials.json"
        );
    }

    #[test]
    fn test_status_errors_display() {
        let err = Error::AuthenticationRejected {
            endpoint: "/login".to_string(),
            status: 401,
        };
        assert_eq!(err.to_string(), "authentication rejected by /login (HTTP 401)");

        let err = Error::UnexpectedStatus {
            endpoint: "/code/api/v1/repositories".to_string(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "/code/api/v1/repositories returned HTTP 500"
        );
    }
}
