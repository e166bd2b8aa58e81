use std::time::Duration;

/// Data source identifiers
pub const DATA_SOURCE_YAHOO: &str = "YAHOO";
pub const DATA_SOURCE_MANUAL: &str = "MANUAL";

/// How long a latest quote stays fresh
pub const QUOTE_CACHE_TTL: Duration = Duration::from_secs(30);

/// How long a fetched FX rate stays fresh
pub const FX_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Tickers fetched concurrently per provider round
pub const PROVIDER_BATCH_SIZE: usize = 10;
