//! JSON run descriptions and CLI parsing for the demo drivers.

pub mod run;

pub use run::{load_config, parse_cli, DemoArgs, RunConfig, SegmentConfig};
