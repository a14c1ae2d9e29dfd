//! Edge I/O for sample logs and results.
//!
//! - `parse_sample_csv` / `load_sample_csv`: read a header + rows CSV with
//!   time, position and force columns (common aliases accepted).
//! - `metrics_csv` / `write_metrics_csv`: one row per layer, fixed columns.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::types::{LayerRecord, SampleLog};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const TIME_ALIASES: &[&str] = &[
    "time",
    "time_s",
    "t",
    "elapsed",
    "elapsed_time",
    "elapsed_time_s",
    "timestamp",
];
const POSITION_ALIASES: &[&str] = &[
    "position",
    "position_mm",
    "pos",
    "stage_position",
    "z",
    "z_position",
    "displacement",
];
const FORCE_ALIASES: &[&str] = &["force", "force_n", "load", "load_n", "f"];

const METRICS_HEADER: &str = "layer_number,peak_index,stable_start,stable_end,\
sandwich_start,sandwich_end,lifting_start,lifting_end,retraction_start,retraction_end,\
peak_force_n,peak_force_time_s,baseline_force_n,peak_force_corrected_n,\
propagation_end_index,propagation_end_time_s,pre_initiation_duration_s,\
propagation_duration_s,work_of_adhesion_mj,work_of_adhesion_corrected_mj,\
signal_to_noise_ratio";

/// Canonical form of a header cell: byte-order mark stripped, lowercase,
/// unit suffix dropped, separators folded to `_`.
fn normalize_header(raw: &str) -> String {
    let cell = raw.trim_start_matches('\u{feff}').trim().trim_matches('"');
    let cell = match cell.find(['(', '[']) {
        Some(cut) => &cell[..cut],
        None => cell,
    };
    cell.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

fn find_column(headers: &[String], aliases: &[&str], role: &str) -> Result<usize, String> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.as_str()))
        .ok_or_else(|| {
            format!(
                "missing {role} column (accepted: {}; found: {})",
                aliases.join(", "),
                headers.join(", ")
            )
        })
}

fn parse_field(raw: &str, line_no: usize, field: &str) -> Result<f64, String> {
    let cell = raw.trim().trim_matches('"');
    cell.parse::<f64>()
        .map_err(|e| format!("line {line_no}: invalid {field} '{cell}': {e}"))
}

/// Parse CSV text into a validated sample log.
///
/// Blank lines and `#` comments are skipped; the first remaining line is the
/// header. Extra columns are ignored.
pub fn parse_sample_csv(text: &str) -> Result<SampleLog, String> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (_, header) = lines.next().ok_or("no header row found")?;
    let headers: Vec<String> = header.split(',').map(normalize_header).collect();
    let time_col = find_column(&headers, TIME_ALIASES, "time")?;
    let position_col = find_column(&headers, POSITION_ALIASES, "position")?;
    let force_col = find_column(&headers, FORCE_ALIASES, "force")?;
    let needed = time_col.max(position_col).max(force_col) + 1;

    let mut times = Vec::new();
    let mut positions = Vec::new();
    let mut forces = Vec::new();
    for (line_no, line) in lines {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < needed {
            return Err(format!(
                "line {line_no}: expected at least {needed} columns, found {}",
                parts.len()
            ));
        }
        times.push(parse_field(parts[time_col], line_no, "time")?);
        positions.push(parse_field(parts[position_col], line_no, "position")?);
        forces.push(parse_field(parts[force_col], line_no, "force")?);
    }

    SampleLog::new(times, positions, forces).map_err(|e| e.to_string())
}

/// Read and parse a CSV sample log from disk.
pub fn load_sample_csv(path: &Path) -> Result<SampleLog, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read samples {}: {e}", path.display()))?;
    parse_sample_csv(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn push_opt(row: &mut String, value: Option<impl std::fmt::Display>) {
    row.push(',');
    if let Some(v) = value {
        let _ = write!(row, "{v}");
    }
}

/// Render one CSV row per layer; metric cells stay empty for skipped layers.
pub fn metrics_csv(layers: &[LayerRecord]) -> String {
    let mut out = String::from(METRICS_HEADER);
    out.push('\n');
    for layer in layers {
        let mut row = format!(
            "{},{},{},{}",
            layer.layer_number, layer.peak_index, layer.stable.start, layer.stable.end
        );
        push_opt(&mut row, layer.sandwich.map(|s| s.start));
        push_opt(&mut row, layer.sandwich.map(|s| s.end));
        for v in [
            layer.lifting.start,
            layer.lifting.end,
            layer.retraction.start,
            layer.retraction.end,
        ] {
            push_opt(&mut row, Some(v));
        }
        let m = layer.metrics.as_ref();
        push_opt(&mut row, m.map(|m| m.peak_force));
        push_opt(&mut row, m.map(|m| m.peak_force_time));
        push_opt(&mut row, m.map(|m| m.baseline_force));
        push_opt(&mut row, m.map(|m| m.peak_force_corrected));
        push_opt(&mut row, m.map(|m| m.propagation_end_index));
        push_opt(&mut row, m.map(|m| m.propagation_end_time));
        push_opt(&mut row, m.map(|m| m.pre_initiation_duration));
        push_opt(&mut row, m.map(|m| m.propagation_duration));
        push_opt(&mut row, m.map(|m| m.work_of_adhesion_mj));
        push_opt(&mut row, m.map(|m| m.work_of_adhesion_corrected_mj));
        push_opt(&mut row, m.map(|m| m.signal_to_noise_ratio));
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Write [`metrics_csv`] output to `path`, creating parent directories.
pub fn write_metrics_csv(path: &Path, layers: &[LayerRecord]) -> Result<(), String> {
    ensure_parent_dir(path)?;
    fs::write(path, metrics_csv(layers))
        .map_err(|e| format!("Failed to write CSV {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IndexRange, MetricsRecord, TravelDirection};

    #[test]
    fn header_aliases_are_normalized() {
        assert_eq!(normalize_header(" Force (N) "), "force");
        assert_eq!(normalize_header("Elapsed Time [s]"), "elapsed_time");
        assert_eq!(normalize_header("\"Z-Position\""), "z_position");
        assert_eq!(normalize_header("time_s"), "time_s");
    }

    #[test]
    fn parses_reordered_aliased_columns() {
        let text = "# exported log\nLoad (N),Elapsed Time [s],Z (mm),note\n\
                    0.01,0.00,0.0,a\n0.02,0.01,0.1,b\n\n0.03,0.02,0.2,c\n";
        let log = parse_sample_csv(text).expect("parse");
        assert_eq!(log.len(), 3);
        assert_eq!(log.times(), &[0.0, 0.01, 0.02]);
        assert_eq!(log.positions(), &[0.0, 0.1, 0.2]);
        assert_eq!(log.forces(), &[0.01, 0.02, 0.03]);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        assert_eq!(normalize_header("\u{feff}Time (s)"), "time");
        let log = parse_sample_csv("\u{feff}time,position,force\n0,0,0.01\n0.01,0.02,0.02\n")
            .expect("parse");
        assert_eq!(log.len(), 2);
        assert_eq!(log.forces(), &[0.01, 0.02]);
    }

    #[test]
    fn missing_force_column_is_reported() {
        let err = parse_sample_csv("time,position\n0,0\n").expect_err("no force");
        assert!(err.contains("missing force column"), "{err}");
    }

    #[test]
    fn bad_value_reports_line_number() {
        let err = parse_sample_csv("t,pos,f\n0,0,0\n0.1,x,0\n").expect_err("bad value");
        assert!(err.starts_with("line 3: invalid position 'x'"), "{err}");
    }

    #[test]
    fn non_increasing_time_is_rejected() {
        let err = parse_sample_csv("t,pos,f\n0,0,0\n0,0,0\n").expect_err("duplicate time");
        assert!(err.contains("strictly increasing"), "{err}");
    }

    #[test]
    fn metrics_rows_leave_missing_values_empty() {
        let mut layer = LayerRecord {
            layer_number: 3,
            stable: IndexRange::new(0, 10),
            sandwich: None,
            lifting: IndexRange::new(10, 30),
            retraction: IndexRange::new(30, 50),
            lift_direction: TravelDirection::Increasing,
            peak_index: 15,
            peak_force: 0.2,
            peak_time: 0.15,
            metrics: None,
        };
        let skipped = metrics_csv(std::slice::from_ref(&layer));
        let columns = METRICS_HEADER.split(',').count();
        let row = skipped.lines().nth(1).expect("row");
        assert_eq!(row.split(',').count(), columns);
        assert!(row.starts_with("3,15,0,10,,,10,30,30,50,"));

        layer.metrics = Some(MetricsRecord {
            peak_force: 0.2,
            peak_force_time: 0.15,
            baseline_force: 0.01,
            peak_force_corrected: 0.19,
            propagation_end_time: 0.25,
            propagation_end_index: 25,
            pre_initiation_duration: 0.05,
            propagation_duration: 0.1,
            work_of_adhesion_mj: 0.11,
            work_of_adhesion_corrected_mj: 0.1,
            signal_to_noise_ratio: 42.0,
        });
        let full = metrics_csv(&[layer]);
        let row = full.lines().nth(1).expect("row");
        assert_eq!(row.split(',').count(), columns);
        assert!(row.ends_with(",42"), "{row}");
    }
}
