use sprint_profiler::config::{self, RunConfig};
use sprint_profiler::diagnostics::RunReport;
use sprint_profiler::RunPipeline;
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "profile_demo".to_string());
    let args = config::parse_cli(&program)?;
    let config: RunConfig = config::load_config(&args.config_path)?;
    let (run, segments) = config.build()?;

    let pipeline = RunPipeline::new(config.options);
    let report = pipeline.process(run, segments);

    if args.json_out {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        print_text_summary(&report);
    }
    Ok(())
}

fn print_text_summary(report: &RunReport) {
    println!("run {} status={:?}", report.run.id, report.run.status);
    if let Some(error) = &report.error {
        println!("  aborted: {error}");
        return;
    }
    if let Some(merged) = &report.merged {
        let s = &merged.summary;
        println!(
            "  steps: {} total ({} real, {} interpolated, {} duplicates recorded)",
            s.total_steps, s.real_steps, s.interpolated_steps, s.duplicate_steps
        );
        println!(
            "  stride: mean {:.2} m, median {:.2} m | speed: avg {:.2} m/s, max {:.2} m/s",
            s.mean_stride_m, s.median_stride_m, s.avg_speed_mps, s.max_speed_mps
        );
        println!(
            "  cadence: {:.0} spm | time: {:.2} s over {:.1} m",
            s.mean_cadence_spm, s.total_time_s, s.distance_covered_m
        );
        for warning in &merged.warnings {
            println!("  warning: {warning:?}");
        }
    }
    match (&report.profile, &report.insufficient, &report.regression_error) {
        (Some(p), _, _) => {
            println!(
                "  profile ({:?}): F0={:.0} N, V0={:.2} m/s, Pmax={:.0} W, RFmax={:.1}%, DRF={:.2}, R2={:.3}",
                p.quality, p.f0_n, p.v0_mps, p.pmax_w, p.rfmax_pct, p.drf, p.regression.r_squared
            );
            for warning in &p.warnings {
                println!("  profile warning: {warning}");
            }
        }
        (None, Some(reason), _) => println!("  profile skipped: {reason:?}"),
        (None, None, Some(error)) => println!("  profile failed: {error}"),
        (None, None, None) => {}
    }
}
