use adhesion_analyzer::config::analyze::load_config;
use adhesion_analyzer::io::{load_sample_csv, write_json_file, write_metrics_csv};
use adhesion_analyzer::AdhesionAnalyzer;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: analyze_log <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let log = load_sample_csv(&config.input_path)?;
    let analyzer = AdhesionAnalyzer::new(config.params.clone())
        .map_err(|e| format!("Invalid parameters: {e}"))?;
    let report = analyzer
        .analyze_with_diagnostics(log.as_view(), config.known_layers.as_deref())
        .map_err(|e| format!("Analysis of {} failed: {e}", config.input_path.display()))?;

    println!("Analysis summary ({})", config.input_path.display());
    for line in report.summary().lines() {
        println!("  {line}");
    }

    if let Some(path) = &config.output.metrics_csv {
        write_metrics_csv(path, &report.result.layers)?;
        println!("\nMetrics CSV written to {}", path.display());
    }
    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}
