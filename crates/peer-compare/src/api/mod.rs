//! API clients for similarity providers and price data

pub mod finviz;
pub mod polygon;
pub mod yahoo;

pub use finviz::{CompareAxis, FinvizClient};
pub use polygon::{CompanyMeta, PolygonClient};
pub use yahoo::{PriceSeries, Quote, YahooFinanceClient};
