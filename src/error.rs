//! Broker-level error types shared across discovery, key retrieval, exchange, and validation.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical broker error exposed by public APIs.
///
/// Each variant wraps one closed category so callers can branch on failure kind (retry a
/// transient exchange error, fail fast on configuration) instead of matching message strings.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider metadata discovery failure.
	#[error(transparent)]
	Discovery(#[from] DiscoveryError),
	/// Signing key retrieval failure.
	#[error(transparent)]
	KeySet(#[from] KeySetError),
	/// Refresh-token exchange failure.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// Access token verification failure.
	#[error(transparent)]
	Validation(#[from] ValidationError),
}

/// Configuration failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required credential is absent or empty.
	#[error("Credential `{field}` is missing.")]
	MissingCredential {
		/// Credential label (`client_id`, `client_secret`, `refresh_token`).
		field: &'static str,
	},
	/// Required credential still carries the deployment placeholder.
	#[error("Credential `{field}` is still set to the UNSET placeholder.")]
	PlaceholderCredential {
		/// Credential label.
		field: &'static str,
	},
	/// Discovery URL cannot be parsed.
	#[error("Discovery URL is invalid.")]
	InvalidDiscoveryUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures while fetching or decoding the provider's discovery document.
#[derive(Debug, ThisError)]
pub enum DiscoveryError {
	/// Discovery endpoint could not be reached.
	#[error("Discovery endpoint could not be reached.")]
	Request(#[source] ReqwestError),
	/// Discovery endpoint answered with a non-success status.
	#[error("Discovery endpoint returned status {status}.")]
	Status {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Discovery document is malformed or missing required fields.
	#[error("Discovery document is malformed or missing required fields.")]
	MalformedDocument(#[source] JsonPathError),
}

/// Failures while fetching or decoding the provider's JWKS.
#[derive(Debug, ThisError)]
pub enum KeySetError {
	/// JWKS endpoint could not be reached.
	#[error("JWKS endpoint could not be reached.")]
	Request(#[source] ReqwestError),
	/// JWKS endpoint answered with a non-success status.
	#[error("JWKS endpoint returned status {status}.")]
	Status {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// JWKS document is malformed or missing its `keys` sequence.
	#[error("JWKS document is malformed or missing its `keys` sequence.")]
	MalformedDocument(#[source] JsonPathError),
}

/// Failures while exchanging the refresh token for an access token.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Request(#[source] ReqwestError),
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned status {status}.")]
	Status {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Token endpoint returned malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse(#[source] JsonPathError),
}

/// Failures while verifying an issued access token.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// No published key matches the supported signing algorithm.
	#[error("JWKS contains no key matching the {algorithm} algorithm.")]
	NoMatchingKey {
		/// Algorithm the validator requires.
		algorithm: &'static str,
	},
	/// Selected key is missing the RSA material needed to verify signatures.
	#[error("Selected signing key is missing its RSA components.")]
	MissingKeyMaterial,
	/// Token expiration claim is in the past.
	#[error("Access token is expired.")]
	Expired,
	/// Signature or claim verification failed.
	#[error("Access token failed verification.")]
	Invalid(#[source] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn category_errors_convert_into_the_canonical_error() {
		let err = Error::from(ConfigError::MissingCredential { field: "client_id" });

		assert!(matches!(err, Error::Config(ConfigError::MissingCredential { field: "client_id" })));

		let err = Error::from(ValidationError::Expired);

		assert!(matches!(err, Error::Validation(ValidationError::Expired)));
	}

	#[test]
	fn messages_name_the_failing_credential() {
		let err = ConfigError::PlaceholderCredential { field: "refresh_token" };

		assert_eq!(err.to_string(), "Credential `refresh_token` is still set to the UNSET placeholder.");
	}
}
