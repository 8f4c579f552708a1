pub mod batch;
pub mod cleaner;
pub mod csv_store;
pub mod eastmoney;
pub mod enricher;
pub mod fetcher;

pub use batch::{BatchOrchestrator, BatchSummary, SymbolReport, SymbolStatus};
pub use eastmoney::{EastmoneyClient, EastmoneyError};
pub use fetcher::{Fetcher, HistoryProvider};
