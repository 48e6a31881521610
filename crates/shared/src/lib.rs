//! Process bootstrap shared by CityReport binaries

pub mod bootstrap;

pub use bootstrap::init_tracing;
