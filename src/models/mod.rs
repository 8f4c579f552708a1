mod bar;
mod series;
pub mod indicators;

pub use bar::{Bar, RawBar};
pub use series::{CleanedSeries, EnrichedBar, EnrichedSeries, FetchOutcome, RawSeries};
