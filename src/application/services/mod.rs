//! Business logic services for the application layer.

pub mod click_recorder;
pub mod link_registry;
pub mod stats_aggregator;

pub use click_recorder::ClickRecorder;
pub use link_registry::LinkRegistry;
pub use stats_aggregator::{StatsAggregator, StatsView};
