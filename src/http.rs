//! Shared HTTP client defaults for every SSO-facing request.

// std
use std::{ops::Deref, time::Duration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Timeout applied to discovery, key set, token exchange, and ESI requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The SSO's endpoints answer directly instead of delegating to another URI, so the default
/// client refuses redirects; configure any custom [`ReqwestClient`] passed to
/// [`with_client`](Self::with_client) the same way. Every request carries a finite timeout so
/// a stalled provider cannot wedge the caller.
#[derive(Clone, Debug)]
pub struct SsoHttpClient(ReqwestClient);
impl SsoHttpClient {
	/// Builds the default client: finite timeout, redirect following disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(REQUEST_TIMEOUT)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for SsoHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for SsoHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Formats the `Host` header value for `url`, including the port when non-default.
pub(crate) fn host_header(url: &Url) -> Option<String> {
	let host = url.host_str()?;

	Some(match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_owned(),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn host_header_includes_non_default_ports() {
		let with_port =
			Url::parse("http://127.0.0.1:8080/v2/oauth/token").expect("Mock URL should parse.");
		let without_port = Url::parse("https://login.eveonline.com/v2/oauth/token")
			.expect("Production URL should parse.");

		assert_eq!(host_header(&with_port).as_deref(), Some("127.0.0.1:8080"));
		assert_eq!(host_header(&without_port).as_deref(), Some("login.eveonline.com"));
	}

	#[test]
	fn host_header_skips_hostless_urls() {
		let hostless = Url::parse("data:text/plain,hello").expect("Data URL should parse.");

		assert_eq!(host_header(&hostless), None);
	}
}
