//! Decoded access token claims and the audience forms the provider publishes.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Verified claim set decoded from an issued access token.
///
/// Only the claims this crate interprets are typed; everything else the provider adds
/// (`scp`, `owner`, `tenant`, ...) lands in [`extra`](Self::extra) uninterpreted.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenClaims {
	/// Expiry as a Unix timestamp.
	pub exp: i64,
	/// Issuer that signed the token.
	pub iss: String,
	/// Audience the token was minted for.
	pub aud: Audience,
	/// Subject identifier, `CHARACTER:EVE:<id>` for character tokens.
	pub sub: Option<String>,
	/// Character name, when the provider includes one.
	pub name: Option<String>,
	/// Issued-at Unix timestamp, when present.
	pub iat: Option<i64>,
	/// Remaining provider-specific claims, passed through uninterpreted.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// Audience claim, published either as a single string or as an array of entries.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Audience {
	/// Single audience string.
	Single(String),
	/// Multiple audience entries, e.g. `["<client_id>", "EVE Online"]`.
	Multiple(Vec<String>),
}
impl Audience {
	/// Returns `true` when `expected` is among the published audiences.
	pub fn contains(&self, expected: &str) -> bool {
		match self {
			Self::Single(audience) => audience == expected,
			Self::Multiple(audiences) => audiences.iter().any(|audience| audience == expected),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn claims_capture_typed_and_extra_fields() {
		let payload = r#"{
			"scp": ["esi-markets.structure_markets.v1"],
			"jti": "998e12c7-3241-43c5-8355-2c48822e0a1b",
			"kid": "JWT-Signature-Key",
			"sub": "CHARACTER:EVE:2114794365",
			"tenant": "tranquility",
			"aud": ["client-id", "EVE Online"],
			"name": "Ember Fireheart",
			"iss": "https://login.eveonline.com",
			"exp": 1800000000,
			"iat": 1799998800
		}"#;
		let claims: AccessTokenClaims =
			serde_json::from_str(payload).expect("Claim payload should deserialize.");

		assert_eq!(claims.exp, 1_800_000_000);
		assert_eq!(claims.iss, "https://login.eveonline.com");
		assert!(claims.aud.contains("EVE Online"));
		assert_eq!(claims.sub.as_deref(), Some("CHARACTER:EVE:2114794365"));
		assert_eq!(claims.name.as_deref(), Some("Ember Fireheart"));
		assert_eq!(claims.iat, Some(1_799_998_800));
		assert!(claims.extra.contains_key("scp"));
		assert!(claims.extra.contains_key("tenant"));
	}

	#[test]
	fn single_audience_still_deserializes() {
		let payload = r#"{"aud": "EVE Online", "exp": 1, "iss": "login.eveonline.com"}"#;
		let claims: AccessTokenClaims =
			serde_json::from_str(payload).expect("Single-audience payload should deserialize.");

		assert_eq!(claims.aud, Audience::Single("EVE Online".into()));
		assert_eq!(claims.sub, None);
	}

	#[test]
	fn audience_matches_single_and_array_forms() {
		let single = Audience::Single("EVE Online".into());
		let multiple = Audience::Multiple(vec!["client-id".into(), "EVE Online".into()]);

		assert!(single.contains("EVE Online"));
		assert!(multiple.contains("EVE Online"));
		assert!(!single.contains("client-id"));
		assert!(!Audience::Multiple(Vec::new()).contains("EVE Online"));
	}
}
