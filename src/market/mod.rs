pub mod hub;
pub mod series;

pub use hub::{FeedUpdate, IngestOutcome, MarketHub, SeriesSnapshot};
pub use series::{DaySummary, SeriesState};
