pub mod catalog;
pub mod genre_stats;
pub mod rate_limit;
pub mod recommendations;
pub mod scoring;
pub mod title_matcher;
pub mod title_search;

pub use recommendations::{RecommendOptions, RecommendationEngine};
