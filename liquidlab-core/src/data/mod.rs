//! Data acquisition and the CSV files handed between pipeline stages.

pub mod page;
pub mod provider;
pub mod schema;
pub mod table;
pub mod yahoo;

#[cfg(feature = "browser")]
pub use page::ChromePageSource;
pub use page::{HttpPageSource, PageSource, ScrapeError};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use schema::{FlowSchema, MetricSchema, PolicySchema, PriceSchema, SchemaError};
pub use table::{extract_first_table, Table};
pub use yahoo::YahooProvider;
