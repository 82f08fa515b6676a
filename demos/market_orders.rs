//! Exchanges the configured refresh token against the live EVE SSO, then spends the minted
//! access token on one authenticated ESI market request.
//!
//! ```sh
//! EVE_CLIENT_ID=... EVE_SECRET_KEY=... REFRESH_TOKEN=... \
//! cargo run --example market_orders
//! ```

// crates.io
use color_eyre::Result;
// self
use eve_sso_broker::{broker::TokenBroker, config::BrokerConfig, esi::EsiClient};

// A Keepstar with a public market; swap in any structure your character can dock at.
const STRUCTURE_ID: u64 = 1_040_278_453_044;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = BrokerConfig::from_env()?;
	let broker = TokenBroker::connect(config).await?;

	println!("Token endpoint: {}.", broker.metadata.token_endpoint);
	println!("JWKS endpoint: {}.", broker.metadata.jwks_uri);

	let token = broker.access_token().await?;

	println!("Minted an access token valid until unix {}.", token.expiration_unix);

	let esi = EsiClient::new(broker)?;
	let orders = esi.structure_market_orders(STRUCTURE_ID).await?;
	let listed = orders.as_array().map(Vec::as_slice).unwrap_or_default();

	println!("Structure {STRUCTURE_ID} lists {} orders on its market.", listed.len());

	for order in listed.iter().take(5) {
		println!(
			"  type {} x{} at {} ISK ({}).",
			order["type_id"],
			order["volume_remain"],
			order["price"],
			if order["is_buy_order"].as_bool().unwrap_or(false) { "buy" } else { "sell" },
		);
	}

	Ok(())
}
