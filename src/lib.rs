pub mod burst_pipeline;
pub mod logger;
