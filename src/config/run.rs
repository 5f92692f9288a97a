use crate::analyzer::ContactEvent;
use crate::calibration::CalibrationInput;
use crate::pipeline::PipelineOptions;
use crate::run::{Athlete, Run, RunSegment};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One camera segment as described on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct SegmentConfig {
    pub start_m: f64,
    pub end_m: f64,
    pub fps: f64,
    #[serde(default)]
    pub order_index: Option<u32>,
    pub calibration: CalibrationInput,
    pub events: Vec<ContactEvent>,
}

/// Complete run description consumed by the demo drivers.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_run_id")]
    pub run_id: u32,
    pub total_distance_m: f64,
    pub athlete: Athlete,
    #[serde(default)]
    pub options: PipelineOptions,
    pub segments: Vec<SegmentConfig>,
}

fn default_run_id() -> u32 {
    1
}

impl RunConfig {
    /// Materialize the run and its segments, leaving calibration solving to
    /// the pipeline.
    pub fn build(&self) -> Result<(Run, Vec<RunSegment>), String> {
        let run = Run::new(self.run_id, self.total_distance_m, self.athlete);
        let mut segments = Vec::with_capacity(self.segments.len());
        for (index, sc) in self.segments.iter().enumerate() {
            let mut segment = RunSegment::new(index as u32, sc.start_m, sc.end_m, sc.fps);
            segment.order_index = sc.order_index;
            segment
                .upload_events(sc.events.clone())
                .map_err(|e| format!("segment {index}: {e}"))?;
            segment.calibration_marks = Some(sc.calibration);
            segments.push(segment);
        }
        Ok((run, segments))
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RunConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

/// Demo driver arguments: a config path plus an optional JSON report flag.
#[derive(Clone, Debug)]
pub struct DemoArgs {
    pub config_path: PathBuf,
    pub json_out: bool,
}

pub fn parse_cli(program: &str) -> Result<DemoArgs, String> {
    let mut config_path = None;
    let mut json_out = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_out = true,
            "--help" | "-h" => {
                return Err(format!("Usage: {program} <run-config.json> [--json]"));
            }
            other if config_path.is_none() => config_path = Some(PathBuf::from(other)),
            other => return Err(format!("Unexpected argument: {other}")),
        }
    }
    let config_path =
        config_path.ok_or_else(|| format!("Usage: {program} <run-config.json> [--json]"))?;
    Ok(DemoArgs {
        config_path,
        json_out,
    })
}
