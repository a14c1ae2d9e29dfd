use adhesion_analyzer::{AdhesionAnalyzer, AnalysisParams, SampleLog};

fn main() {
    // Demo stub: a flat 10 s log at 100 Hz, which holds no peel events.
    let n = 1000usize;
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let positions = vec![0.0; n];
    let forces = vec![0.01; n];

    let outcome = SampleLog::new(times, positions, forces).and_then(|log| {
        AdhesionAnalyzer::new(AnalysisParams::default())?.analyze(log.as_view(), None)
    });
    match outcome {
        Ok(result) => println!("status={:?} layers={}", result.status, result.layers.len()),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
