//! EVE Online SSO broker: exchange one refresh token for verified, cached access tokens.
//!
//! The broker resolves the SSO's well-known metadata once, then serves
//! [`broker::TokenBroker::access_token`] calls from a single cache slot, performing a
//! `grant_type=refresh_token` exchange only when the cached token's verified expiry has passed.
//! Every issued token is signature-checked (RS256) against freshly fetched signing keys before
//! it is cached or returned.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod broker;
pub mod config;
pub mod discovery;
pub mod error;
pub mod esi;
pub mod http;
pub mod jwks;
pub mod obs;
pub mod validate;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
