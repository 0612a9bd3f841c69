//! gdata-sheets - Read client for the legacy GData spreadsheet feeds
//!
//! This crate fetches spreadsheet metadata, worksheet lists, list-feed rows and
//! cell-feed grids, and converts the feed XML into typed, normalized objects.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gdata_sheets::{ClientBuilder, SpreadsheetOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a client with default settings
//!     let client = ClientBuilder::new().build()?;
//!
//!     // Fetch a published spreadsheet (public/values)
//!     let sheet = client.spreadsheet(&SpreadsheetOptions::new("0AkD...")).await?;
//!     println!("{} (updated {})", sheet.title, sheet.updated);
//!
//!     for worksheet in &sheet.worksheets {
//!         println!("- {} [{}x{}]", worksheet.title, worksheet.row_count, worksheet.col_count);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rows and Cells
//!
//! ```rust,no_run
//! use gdata_sheets::{CellsOptions, ClientBuilder, RowsOptions};
//!
//! # async fn run() -> Result<(), gdata_sheets::FeedError> {
//! let client = ClientBuilder::new().build()?;
//!
//! // Private feeds (private/full) are selected by passing a token
//! let rows = client
//!     .rows(&RowsOptions::new("0AkD...", "od6").with_auth("token").with_num(20))
//!     .await?;
//! for row in &rows {
//!     println!("{:?}", row.get("name"));
//! }
//!
//! let cells = client
//!     .cells(&CellsOptions::new("0AkD...", "od6").with_range("A1:C10"))
//!     .await?;
//! if let Some(cell) = cells.get("1", "1") {
//!     println!("A1 = {}", cell.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Transport
//!
//! Any type implementing [`Transport`] can replace the default `reqwest` client:
//!
//! ```rust,no_run
//! use std::future::Future;
//! use gdata_sheets::{BoxError, ClientBuilder, FeedRequest, FeedResponse, Transport};
//!
//! struct Canned(&'static str);
//!
//! impl Transport for Canned {
//!     fn get(
//!         &self,
//!         _request: FeedRequest,
//!     ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send {
//!         let body = self.0.as_bytes().to_vec();
//!         std::future::ready(Ok(Some(FeedResponse { status: 200, body })))
//!     }
//! }
//!
//! # fn main() -> Result<(), gdata_sheets::FeedError> {
//! let client = ClientBuilder::new().build_with_transport(Canned("<feed/>"))?;
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod feed;
mod grid;
mod parser;
mod security;
mod transport;
mod types;

// 公開API
pub use api::{CellsOptions, Projection, RowsOptions, SpreadsheetOptions, Visibility};
pub use builder::{Client, ClientBuilder};
pub use error::{BoxError, FeedError};
pub use feed::FEED_URL;
pub use grid::{Cell, Cells};
pub use security::FeedLimits;
pub use transport::{FeedRequest, FeedResponse, ReqwestTransport, Transport};
pub use types::{Author, Row, SheetScope, Spreadsheet, Worksheet};
