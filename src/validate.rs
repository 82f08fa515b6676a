//! RS256 validation of minted access tokens.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind};
// self
use crate::{
	_prelude::*,
	auth::AccessTokenClaims,
	error::ValidationError,
	jwks::{KeySet, SigningKey},
};

/// The only signature algorithm the broker accepts.
pub const SUPPORTED_ALGORITHM: &str = "RS256";
/// Audience every minted access token must name.
pub const EXPECTED_AUDIENCE: &str = "EVE Online";
/// Issuer spellings accepted in minted tokens.
///
/// The SSO has published tokens under both spellings over its lifetime, so both stay
/// accepted.
pub const ACCEPTED_ISSUERS: [&str; 2] = ["login.eveonline.com", "https://login.eveonline.com"];

/// Verifies minted access tokens against a freshly fetched [`KeySet`].
///
/// A token passes only when its RS256 signature checks out against a published key and its
/// `exp`, `iss`, and `aud` claims are all present and acceptable. No expiry leeway is
/// granted.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenValidator;
impl TokenValidator {
	/// Validates `raw_jwt` and returns its decoded claims.
	pub fn validate(
		&self,
		raw_jwt: &str,
		key_set: &KeySet,
	) -> Result<AccessTokenClaims, ValidationError> {
		let header = decode_header(raw_jwt).map_err(ValidationError::Invalid)?;
		let key = key_set
			.find(SUPPORTED_ALGORITHM, header.kid.as_deref())
			.ok_or(ValidationError::NoMatchingKey { algorithm: SUPPORTED_ALGORITHM })?;
		let decoding_key = rsa_decoding_key(key)?;
		let decoded = decode::<AccessTokenClaims>(raw_jwt, &decoding_key, &claim_checks())
			.map_err(|source| {
				if matches!(source.kind(), ErrorKind::ExpiredSignature) {
					ValidationError::Expired
				} else {
					ValidationError::Invalid(source)
				}
			})?;

		Ok(decoded.claims)
	}
}

/// Builds the decoding key from a published RSA entry.
fn rsa_decoding_key(key: &SigningKey) -> Result<DecodingKey, ValidationError> {
	let (Some(n), Some(e)) = (key.n.as_deref(), key.e.as_deref()) else {
		return Err(ValidationError::MissingKeyMaterial);
	};

	DecodingKey::from_rsa_components(n, e).map_err(ValidationError::Invalid)
}

/// Claim checks applied alongside the signature check.
fn claim_checks() -> Validation {
	let mut validation = Validation::new(Algorithm::RS256);

	validation.set_audience(&[EXPECTED_AUDIENCE]);
	validation.set_issuer(&ACCEPTED_ISSUERS);
	validation.set_required_spec_claims(&["exp", "iss", "aud"]);
	validation.leeway = 0;

	validation
}
