// std
use std::sync::OnceLock;
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use httpmock::{Mock, MockServer, prelude::*};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use rand::rngs::OsRng;
use rsa::{
	RsaPrivateKey,
	pkcs1::{EncodeRsaPrivateKey, LineEnding},
	traits::PublicKeyParts,
};
use serde_json::{Value, json};

pub const DISCOVERY_PATH: &str = "/.well-known/oauth-authorization-server/";
pub const TOKEN_PATH: &str = "/v2/oauth/token";

const JWKS_PATH: &str = "/oauth/jwks";
const TEST_KID: &str = "JWT-Signature-Key";

/// RSA identity the mock SSO signs with.
pub struct ProviderKeys {
	encoding_key: EncodingKey,
	modulus: String,
	exponent: String,
}
impl ProviderKeys {
	fn generate() -> Self {
		let private_key =
			RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation should succeed.");
		let pem = private_key
			.to_pkcs1_pem(LineEnding::LF)
			.expect("PKCS#1 encoding should succeed.");
		let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
			.expect("Generated PEM should be a valid signing key.");
		let public_key = private_key.to_public_key();
		let modulus = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
		let exponent = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

		Self { encoding_key, modulus, exponent }
	}

	fn jwks_body(&self) -> Value {
		json!({
			"SkipUnresolvedJsonWebKeys": true,
			"keys": [
				{
					"alg": "ES256",
					"crv": "P-256",
					"kid": "ES256-Key",
					"kty": "EC",
					"use": "sig",
					"x": "DHrbvvraTrvZwRUmUlUcKLnjtTvcxXEyPrWf4FGzAkk",
					"y": "6hktLrUnhKQa6HUjFv4EU4LbX5xoJSY978hUw0hGTTI"
				},
				{
					"alg": "RS256",
					"e": self.exponent,
					"kid": TEST_KID,
					"kty": "RSA",
					"n": self.modulus,
					"use": "sig"
				}
			]
		})
	}

	/// Signs arbitrary claims under the published key id.
	pub fn sign(&self, claims: &Value) -> String {
		let mut header = Header::new(Algorithm::RS256);

		header.kid = Some(TEST_KID.to_owned());

		encode(&header, claims, &self.encoding_key).expect("Signing should succeed.")
	}

	/// Signs a realistic character access token expiring at `exp`.
	pub fn sign_access_token(&self, exp: i64) -> String {
		self.sign(&access_token_claims(exp))
	}
}

// Key generation is slow, so every test in the binary shares one identity.
pub fn provider_keys() -> &'static ProviderKeys {
	static KEYS: OnceLock<ProviderKeys> = OnceLock::new();

	KEYS.get_or_init(ProviderKeys::generate)
}

/// Claims the SSO mints for a logged-in character, expiring at `exp`.
pub fn access_token_claims(exp: i64) -> Value {
	json!({
		"aud": ["client-id", "EVE Online"],
		"azp": "client-id",
		"exp": exp,
		"iat": exp - 1199,
		"iss": "https://login.eveonline.com",
		"jti": "998e12c7-3241-43c5-8355-2c48822e0a1b",
		"kid": "JWT-Signature-Key",
		"name": "Ember Fireheart",
		"owner": "8PmzCeTKb4VFUDrHLc/AeZXDSWM=",
		"scp": ["esi-markets.structure_markets.v1"],
		"sub": "CHARACTER:EVE:2114794365",
		"tenant": "tranquility",
		"tier": "live"
	})
}

pub fn unix_now() -> i64 {
	time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Token endpoint response body carrying `jwt` as the minted access token.
pub fn token_body(jwt: &str) -> Value {
	json!({
		"access_token": jwt,
		"expires_in": 1199,
		"refresh_token": "rt-123",
		"token_type": "Bearer",
	})
}

fn discovery_body(server: &MockServer) -> Value {
	json!({
		"issuer": server.base_url(),
		"jwks_uri": server.url(JWKS_PATH),
		"token_endpoint": server.url(TOKEN_PATH),
	})
}

pub async fn mount_discovery(server: &MockServer) -> Mock<'_> {
	let body = discovery_body(server);

	server
		.mock_async(move |when, then| {
			when.method(GET).path(DISCOVERY_PATH);
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}

pub async fn mount_jwks<'a>(server: &'a MockServer, keys: &ProviderKeys) -> Mock<'a> {
	let body = keys.jwks_body();

	server
		.mock_async(move |when, then| {
			when.method(GET).path(JWKS_PATH);
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}

pub async fn mount_token_exchange<'a>(server: &'a MockServer, jwt: &str) -> Mock<'a> {
	let body = token_body(jwt);

	server
		.mock_async(move |when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}
