//! OAuth authorization server metadata discovery.

// crates.io
use serde_json::Deserializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, DiscoveryError},
	http::SsoHttpClient,
};

/// Published location of the EVE SSO's authorization server metadata.
///
/// The trailing slash is part of the published location. The SSO answers the slashless
/// spelling with a redirect, which the broker's HTTP client refuses, so the slash matters.
pub const DEFAULT_DISCOVERY_URL: &str =
	"https://login.eveonline.com/.well-known/oauth-authorization-server/";

/// Parses [`DEFAULT_DISCOVERY_URL`].
pub fn default_discovery_url() -> Result<Url, ConfigError> {
	Url::parse(DEFAULT_DISCOVERY_URL)
		.map_err(|source| ConfigError::InvalidDiscoveryUrl { source })
}

/// The two endpoints the broker needs from the metadata document.
///
/// The published document carries many more fields; everything beyond these two is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderMetadata {
	/// Endpoint accepting the refresh token exchange.
	pub token_endpoint: Url,
	/// Endpoint serving the JSON Web Key Set used to verify minted tokens.
	pub jwks_uri: Url,
}

/// Fetches and parses the authorization server metadata document.
#[derive(Clone, Debug)]
pub struct MetadataResolver {
	discovery_url: Url,
	http: SsoHttpClient,
}
impl MetadataResolver {
	/// Creates a resolver for `discovery_url`.
	pub fn new(discovery_url: Url, http: SsoHttpClient) -> Self {
		Self { discovery_url, http }
	}

	/// Fetches the metadata document and extracts the broker's endpoints.
	pub async fn resolve(&self) -> Result<ProviderMetadata, DiscoveryError> {
		let response = self
			.http
			.get(self.discovery_url.clone())
			.send()
			.await
			.map_err(DiscoveryError::Request)?;
		let status = response.status();

		if !status.is_success() {
			return Err(DiscoveryError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(DiscoveryError::Request)?;
		let metadata =
			serde_path_to_error::deserialize(&mut Deserializer::from_slice(&body))
				.map_err(DiscoveryError::MalformedDocument)?;

		Ok(metadata)
	}
}
