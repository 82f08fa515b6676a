//! Credential secrets, decoded claims, and the cached token model.

pub mod claims;
pub mod secret;
pub mod token;

pub use claims::*;
pub use secret::*;
pub use token::*;
