//! Minimal ESI client that spends the broker's tokens.
//!
//! ESI is EVE Online's public game-data API. The client here covers the authenticated
//! structure market route and exists mostly to show a live token being used; it is not a
//! general ESI binding.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, broker::TokenBroker, http::SsoHttpClient};

/// Production ESI root.
///
/// The trailing slash matters: routes are appended directly to this string.
pub const DEFAULT_ESI_BASE_URL: &str = "https://esi.evetech.net/";

/// Failures raised by the ESI client.
#[derive(Debug, ThisError)]
pub enum EsiError {
	/// The broker could not produce a live access token.
	#[error(transparent)]
	Token(#[from] Error),
	/// ESI base URL cannot be parsed.
	#[error("ESI base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// ESI endpoint could not be reached.
	#[error("ESI endpoint could not be reached.")]
	Request(#[source] ReqwestError),
	/// ESI endpoint answered with a non-success status.
	#[error("ESI endpoint returned status {status}.")]
	Status {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// ESI response body is not the expected JSON.
	#[error("ESI response body is malformed.")]
	MalformedBody(#[source] serde_json::Error),
}

/// Authenticated ESI caller backed by a [`TokenBroker`].
///
/// Every request asks the broker for a token first, so callers get cache hits for free and
/// a refresh exchange only when the held token has expired.
#[derive(Clone, Debug)]
pub struct EsiClient {
	broker: TokenBroker,
	base_url: Url,
	http: SsoHttpClient,
}
impl EsiClient {
	/// Creates a client against the production ESI root.
	pub fn new(broker: TokenBroker) -> Result<Self, EsiError> {
		let base_url = Url::parse(DEFAULT_ESI_BASE_URL)
			.map_err(|source| EsiError::InvalidBaseUrl { source })?;
		let http = SsoHttpClient::new().map_err(Error::from)?;

		Ok(Self::with_base_url(broker, base_url, http))
	}

	/// Creates a client against `base_url`, reusing `http` for every request.
	///
	/// `base_url` must end with a slash so routes append cleanly.
	pub fn with_base_url(broker: TokenBroker, base_url: Url, http: SsoHttpClient) -> Self {
		Self { broker, base_url, http }
	}

	/// Fetches one page of market orders for a player-owned structure.
	///
	/// The route requires a token carrying `esi-markets.structure_markets.v1` and a
	/// character with docking access to the structure.
	pub async fn structure_market_orders(&self, structure_id: u64) -> Result<Value, EsiError> {
		self.get_json(&format!("v1/markets/structures/{structure_id}/")).await
	}

	/// Performs an authenticated GET against `route` and parses the JSON body.
	async fn get_json(&self, route: &str) -> Result<Value, EsiError> {
		let token = self.broker.access_token().await?;
		let response = self
			.http
			.get(format!("{}{route}", self.base_url))
			.bearer_auth(token.access_token.expose())
			.send()
			.await
			.map_err(EsiError::Request)?;
		let status = response.status();

		if !status.is_success() {
			return Err(EsiError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(EsiError::Request)?;
		let value = serde_json::from_slice(&body).map_err(EsiError::MalformedBody)?;

		Ok(value)
	}
}
