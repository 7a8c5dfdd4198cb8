pub mod analyzer;
pub mod classify;
pub mod config;
pub mod ctr;
pub mod error;
pub mod input;
pub mod metrics;
pub mod model;

pub use analyzer::report::{AnalysisReport, SnapshotSummary};
pub use analyzer::{analyze, analyze_parallel};
pub use classify::CategoryRules;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use input::AnalysisInput;
pub use metrics::{GrowthGap, ShareOfSearch, ShareOfVoice};
pub use model::{BrandKeyword, FunnelStage, Intent, RankedKeyword, SearchIntent};
