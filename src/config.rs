//! Broker credentials and the environment variables that supply them.

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable holding the application's client identifier.
pub const ENV_CLIENT_ID: &str = "EVE_CLIENT_ID";
/// Environment variable holding the application's client secret.
pub const ENV_CLIENT_SECRET: &str = "EVE_SECRET_KEY";
/// Environment variable holding the long-lived refresh token.
pub const ENV_REFRESH_TOKEN: &str = "REFRESH_TOKEN";

/// Sentinel left behind by configuration templates that were never filled in.
const PLACEHOLDER: &str = "UNSET";

/// Credentials the broker presents to the SSO.
///
/// Construction validates each field, so a held [`BrokerConfig`] is always usable.
/// [`Debug`] output redacts both secrets.
#[derive(Clone, Debug)]
pub struct BrokerConfig {
	/// Client identifier issued when the application was registered.
	pub client_id: String,
	/// Client secret paired with [`client_id`](Self::client_id).
	pub client_secret: TokenSecret,
	/// Refresh token captured during the application's one-time authorization.
	pub refresh_token: TokenSecret,
}
impl BrokerConfig {
	/// Validates the three credentials and assembles a config.
	///
	/// Each value must be non-empty after trimming and must not be the `UNSET` template
	/// placeholder.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = validate_credential("client_id", client_id.into())?;
		let client_secret = validate_credential("client_secret", client_secret.into())?;
		let refresh_token = validate_credential("refresh_token", refresh_token.into())?;

		Ok(Self {
			client_id,
			client_secret: TokenSecret::new(client_secret),
			refresh_token: TokenSecret::new(refresh_token),
		})
	}

	/// Loads the config from [`ENV_CLIENT_ID`], [`ENV_CLIENT_SECRET`], and
	/// [`ENV_REFRESH_TOKEN`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with(|key| env::var(key).ok())
	}

	/// Loads the config through `lookup`, one call per environment variable.
	///
	/// Exists so tests and alternative sources (dotenv files, secret managers) can feed the
	/// same validation path as [`from_env`](Self::from_env).
	pub fn from_env_with(
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<Self, ConfigError> {
		let client_id =
			lookup(ENV_CLIENT_ID).ok_or(ConfigError::MissingCredential { field: "client_id" })?;
		let client_secret = lookup(ENV_CLIENT_SECRET)
			.ok_or(ConfigError::MissingCredential { field: "client_secret" })?;
		let refresh_token = lookup(ENV_REFRESH_TOKEN)
			.ok_or(ConfigError::MissingCredential { field: "refresh_token" })?;

		Self::new(client_id, client_secret, refresh_token)
	}
}

/// Rejects blank and placeholder credentials, returning the value otherwise untouched.
fn validate_credential(field: &'static str, value: String) -> Result<String, ConfigError> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(ConfigError::MissingCredential { field });
	}
	if trimmed == PLACEHOLDER {
		return Err(ConfigError::PlaceholderCredential { field });
	}

	Ok(value)
}
