pub(crate) mod manual_provider;
pub(crate) mod market_data_provider;
pub(crate) mod yahoo_provider;

pub use manual_provider::ManualProvider;
pub use market_data_provider::MarketDataProviderTrait;
pub use yahoo_provider::YahooProvider;
