//! Settlement Networks and Reference Rates
//!
//! Every network the payment service can settle on is declared once in the
//! `define_networks!` invocation below. The macro generates the `Network`
//! enum, its string conversions, and the static quote table served by the
//! exchange-rate endpoint.
//!
//! # Adding a New Network
//! Add a line to the `define_networks!` macro invocation:
//! ```ignore
//! define_networks! {
//!     // ... existing networks ...
//!     Arbitrum => ("arbitrum", "ARB", 0.8),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{Network, supported_networks, usd_quotes};
//!
//! assert_eq!(supported_networks(), vec!["ethereum", "polygon", "bsc"]);
//! assert_eq!(usd_quotes()["ETH/USD"], 3000.0);
//! assert_eq!("polygon".parse::<Network>().unwrap().token(), "MATIC");
//! ```

use std::collections::BTreeMap;

/// Quote currency every rate in the table is expressed in.
pub const QUOTE_CURRENCY: &str = "USD";

/// Error returned when parsing an unknown network slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported network: {0}")]
pub struct UnknownNetwork(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all networks and their runtime lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define networks with their native token and USD quote.
///
/// # Syntax
/// ```ignore
/// define_networks! {
///     VariantName => ("slug", "TOKEN", usd_rate),
/// }
/// ```
#[macro_export]
macro_rules! define_networks {
    (
        $(
            $name:ident => ($slug:literal, $token:literal, $usd:expr)
        ),* $(,)?
    ) => {
        /// A settlement network supported by the payment service.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum Network {
            $($name),*
        }

        impl Network {
            /// Lowercase identifier used on the wire and in storage.
            pub fn slug(&self) -> &'static str {
                match self {
                    $(Network::$name => $slug),*
                }
            }

            /// Symbol of the network's native token.
            pub fn token(&self) -> &'static str {
                match self {
                    $(Network::$name => $token),*
                }
            }

            /// Price of one native token in USD.
            pub fn usd_rate(&self) -> f64 {
                match self {
                    $(Network::$name => $usd),*
                }
            }

            /// All networks, in declaration order.
            pub fn all() -> &'static [Network] {
                &[$(Network::$name),*]
            }
        }

        impl std::fmt::Display for Network {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.slug())
            }
        }

        impl std::str::FromStr for Network {
            type Err = UnknownNetwork;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($slug => Ok(Network::$name),)*
                    _ => Err(UnknownNetwork(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// NETWORK DEFINITIONS
// ─────────────────────────────────────────────────────────────────────────────

define_networks! {
    Ethereum => ("ethereum", "ETH", 3000.0),
    Polygon => ("polygon", "MATIC", 1.5),
    Bsc => ("bsc", "BNB", 400.0),
}

// ─────────────────────────────────────────────────────────────────────────────
// Table lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Slugs of every supported network.
pub fn supported_networks() -> Vec<&'static str> {
    Network::all().iter().map(Network::slug).collect()
}

/// Trading-pair label for a network's token, e.g. `ETH/USD`.
pub fn quote_pair(network: Network) -> String {
    format!("{}/{}", network.token(), QUOTE_CURRENCY)
}

/// The full rate table keyed by trading pair.
pub fn usd_quotes() -> BTreeMap<String, f64> {
    Network::all()
        .iter()
        .map(|&n| (quote_pair(n), n.usd_rate()))
        .collect()
}

/// Values an amount of native token (in whole units) in USD.
pub fn to_usd(network: Network, amount: f64) -> f64 {
    amount * network.usd_rate()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
