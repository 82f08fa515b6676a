//! Cached access token unit returned by the broker.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Verified access token plus the claim expiry bounding its reuse.
///
/// The expiry comes from the token's verified `exp` claim rather than the token endpoint's
/// `expires_in` hint, so cache decisions and signature validation can never disagree about a
/// token's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedToken {
	/// Access token secret spent against authenticated endpoints.
	pub access_token: TokenSecret,
	/// Expiry as a Unix timestamp, taken from the verified `exp` claim.
	pub expiration_unix: i64,
}
impl CachedToken {
	/// Returns `true` when the token is still usable at `now_unix`.
	///
	/// The comparison is strict: a token expiring exactly at `now_unix` is already dead.
	pub fn is_live_at(&self, now_unix: i64) -> bool {
		self.expiration_unix > now_unix
	}

	/// Checks liveness against the current UTC clock.
	pub fn is_live(&self) -> bool {
		self.is_live_at(OffsetDateTime::now_utc().unix_timestamp())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn token_expiring_at(expiration_unix: i64) -> CachedToken {
		CachedToken { access_token: TokenSecret::new("jwt"), expiration_unix }
	}

	#[test]
	fn liveness_requires_a_strictly_future_expiry() {
		let now = datetime!(2030-01-01 12:00 UTC).unix_timestamp();

		assert!(token_expiring_at(now + 1).is_live_at(now));
		assert!(!token_expiring_at(now).is_live_at(now));
		assert!(!token_expiring_at(now - 1).is_live_at(now));
	}

	#[test]
	fn wall_clock_liveness_matches_the_timestamp_check() {
		let now = OffsetDateTime::now_utc().unix_timestamp();

		assert!(token_expiring_at(now + 3_600).is_live());
		assert!(!token_expiring_at(now - 3_600).is_live());
	}

	#[test]
	fn debug_redacts_the_access_token() {
		let rendered = format!("{:?}", token_expiring_at(10));

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("jwt"));
	}
}
