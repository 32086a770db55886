//! Typed configuration management for the report pipeline.

pub mod defaults;
pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    ChartsConfig, Config, DataConfig, ProvisionConfig, ReportConfig, StorageConfig, SynthConfig,
    WebConfig,
};
