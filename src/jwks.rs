//! JSON Web Key Set retrieval and key selection.

// crates.io
use serde_json::Deserializer;
// self
use crate::{_prelude::*, error::KeySetError, http::SsoHttpClient};

/// One published signing key.
///
/// Only the fields the broker reads are modeled. The SSO publishes RSA and EC keys side by
/// side; EC entries carry no `n`/`e`, so the RSA components are optional here and their
/// absence is checked at validation time.
#[derive(Clone, Debug, Deserialize)]
pub struct SigningKey {
	/// Key type, `RSA` or `EC`.
	pub kty: String,
	/// Signature algorithm the key is published for.
	pub alg: String,
	/// Key identifier, echoed in token headers when the SSO signs with this key.
	#[serde(default)]
	pub kid: Option<String>,
	/// RSA modulus, base64url without padding.
	#[serde(default)]
	pub n: Option<String>,
	/// RSA public exponent, base64url without padding.
	#[serde(default)]
	pub e: Option<String>,
}

/// The key set document.
///
/// Unknown top-level fields such as `SkipUnresolvedJsonWebKeys` are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct KeySet {
	/// Published signing keys.
	pub keys: Vec<SigningKey>,
}
impl KeySet {
	/// Selects the key for `algorithm`, preferring an exact `kid` match.
	///
	/// When `kid` is absent, or names no published key, the first key published for
	/// `algorithm` is used instead. The fallback keeps validation working across key
	/// identifier churn while the signature check still rejects any actual mismatch.
	pub fn find(&self, algorithm: &str, kid: Option<&str>) -> Option<&SigningKey> {
		if let Some(kid) = kid {
			let exact = self
				.keys
				.iter()
				.find(|key| key.alg == algorithm && key.kid.as_deref() == Some(kid));

			if exact.is_some() {
				return exact;
			}
		}

		self.keys.iter().find(|key| key.alg == algorithm)
	}
}

/// Fetches the key set from the discovered `jwks_uri`.
///
/// The set is fetched ahead of every validation rather than cached. Key rotation on the
/// provider side therefore takes effect immediately, and a retired key is never trusted
/// past its publication window.
#[derive(Clone, Debug)]
pub struct KeySetProvider {
	jwks_uri: Url,
	http: SsoHttpClient,
}
impl KeySetProvider {
	/// Creates a provider for `jwks_uri`.
	pub fn new(jwks_uri: Url, http: SsoHttpClient) -> Self {
		Self { jwks_uri, http }
	}

	/// Fetches and parses the current key set.
	pub async fn fetch(&self) -> Result<KeySet, KeySetError> {
		let response = self
			.http
			.get(self.jwks_uri.clone())
			.send()
			.await
			.map_err(KeySetError::Request)?;
		let status = response.status();

		if !status.is_success() {
			return Err(KeySetError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(KeySetError::Request)?;
		let key_set = serde_path_to_error::deserialize(&mut Deserializer::from_slice(&body))
			.map_err(KeySetError::MalformedDocument)?;

		Ok(key_set)
	}
}
