//! The token broker: one call returns a live, validated access token.
//!
//! [`TokenBroker::connect`] resolves the SSO's metadata once. Each
//! [`access_token`](TokenBroker::access_token) call then answers from the cache while the
//! held token is still live, or performs a single `grant_type=refresh_token` exchange,
//! validates the minted JWT against a freshly fetched key set, and caches the result.
//! Concurrent callers share one exchange through an async guard.

mod metrics;

pub use metrics::ExchangeMetrics;

// crates.io
use reqwest::header::HOST;
use serde_json::Deserializer;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenSecret},
	config::BrokerConfig,
	discovery::{self, MetadataResolver, ProviderMetadata},
	error::{ExchangeError, ValidationError},
	http::{self, SsoHttpClient},
	jwks::KeySetProvider,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	validate::TokenValidator,
};

/// The slice of the token endpoint's response the broker reads.
///
/// The SSO also returns `expires_in`, `token_type`, and a `refresh_token` field. Expiry
/// comes from the validated `exp` claim and the configured refresh token is presented
/// unchanged on every exchange, so none of those fields are modeled.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
	access_token: TokenSecret,
}

/// Shared handle that exchanges one refresh token for live, validated access tokens.
///
/// Cloning is cheap; clones share the cache slot, the exchange guard, and the metrics.
#[derive(Clone)]
pub struct TokenBroker {
	/// Endpoints resolved from the discovery document at connect time.
	pub metadata: ProviderMetadata,
	/// Counters describing cache and exchange activity.
	pub metrics: Arc<ExchangeMetrics>,
	config: BrokerConfig,
	http: SsoHttpClient,
	keys: KeySetProvider,
	validator: TokenValidator,
	slot: Arc<RwLock<Option<CachedToken>>>,
	exchange_guard: Arc<AsyncMutex<()>>,
}
impl TokenBroker {
	/// Connects against the production discovery document.
	pub async fn connect(config: BrokerConfig) -> Result<Self> {
		let http = SsoHttpClient::new()?;
		let discovery_url = discovery::default_discovery_url()?;

		Self::connect_with(config, discovery_url, http).await
	}

	/// Connects against `discovery_url`, reusing `http` for every later request.
	pub async fn connect_with(
		config: BrokerConfig,
		discovery_url: Url,
		http: SsoHttpClient,
	) -> Result<Self> {
		const KIND: FlowKind = FlowKind::Discovery;

		let span = FlowSpan::new(KIND, "connect");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let resolver = MetadataResolver::new(discovery_url, http.clone());
		let result = span.instrument(resolver.resolve()).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		let metadata = result?;
		let keys = KeySetProvider::new(metadata.jwks_uri.clone(), http.clone());

		Ok(Self {
			metadata,
			metrics: Arc::new(ExchangeMetrics::default()),
			config,
			http,
			keys,
			validator: TokenValidator,
			slot: Arc::new(RwLock::new(None)),
			exchange_guard: Arc::new(AsyncMutex::new(())),
		})
	}

	/// Returns a live access token, answering from the cache whenever possible.
	///
	/// When no live token is held, exactly one refresh exchange runs regardless of how
	/// many callers arrive at once; the rest adopt its result.
	pub async fn access_token(&self) -> Result<CachedToken> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if let Some(token) = self.cached_live() {
					self.metrics.record_cache_hit();

					return Ok(token);
				}

				let _singleflight = self.exchange_guard.lock().await;

				// A waiter adopts the token minted by the exchange it queued behind.
				if let Some(token) = self.cached_live() {
					self.metrics.record_cache_hit();

					return Ok(token);
				}

				self.metrics.record_attempt();

				let minted = self.mint_token().await.inspect_err(|_| {
					self.metrics.record_failure();
				})?;

				*self.slot.write() = Some(minted.clone());
				self.metrics.record_success();

				Ok(minted)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Returns the cached token while it is still strictly live.
	fn cached_live(&self) -> Option<CachedToken> {
		let now = OffsetDateTime::now_utc().unix_timestamp();

		self.slot.read().as_ref().filter(|token| token.is_live_at(now)).cloned()
	}

	/// Exchanges, validates, and stamps a fresh token. Does not touch the cache slot.
	async fn mint_token(&self) -> Result<CachedToken> {
		let raw = self.exchange_refresh_token().await?;
		// Keys are fetched per validation so provider-side rotation takes effect at once.
		let key_set = self.keys.fetch().await?;
		let claims = self.validator.validate(raw.expose(), &key_set)?;
		let token = CachedToken { access_token: raw, expiration_unix: claims.exp };

		// A token must be strictly live when minted; one already at its expiry instant is
		// refused instead of cached.
		if !token.is_live() {
			return Err(ValidationError::Expired.into());
		}

		Ok(token)
	}

	/// Performs the `grant_type=refresh_token` call and returns the raw minted JWT.
	async fn exchange_refresh_token(&self) -> Result<TokenSecret, ExchangeError> {
		let endpoint = self.metadata.token_endpoint.clone();
		let mut request = self
			.http
			.post(endpoint.clone())
			.basic_auth(&self.config.client_id, Some(self.config.client_secret.expose()))
			.form(&[
				("grant_type", "refresh_token"),
				("refresh_token", self.config.refresh_token.expose()),
			]);

		// The SSO rejects exchanges whose Host header disagrees with the published
		// endpoint, so the header is pinned from the discovered URL.
		if let Some(host) = http::host_header(&endpoint) {
			request = request.header(HOST, host);
		}

		let response = request.send().await.map_err(ExchangeError::Request)?;
		let status = response.status();

		if !status.is_success() {
			return Err(ExchangeError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(ExchangeError::Request)?;
		let parsed: ExchangeResponse =
			serde_path_to_error::deserialize(&mut Deserializer::from_slice(&body))
				.map_err(ExchangeError::MalformedResponse)?;

		Ok(parsed.access_token)
	}
}
impl Debug for TokenBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBroker")
			.field("metadata", &self.metadata)
			.field("client_id", &self.config.client_id)
			.field("cached", &self.slot.read().is_some())
			.finish()
	}
}
