use crate::AnalysisParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub metrics_csv: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
}

/// Runtime configuration of the `analyze_log` tool.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub known_layers: Option<Vec<u32>>,
    #[serde(default)]
    pub params: AnalysisParams,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    /// Resolve relative paths against `base` (usually the config's directory).
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.input_path = join(self.input_path);
        self.output.metrics_csv = self.output.metrics_csv.map(join);
        self.output.json_out = self.output.json_out.map(join);
        self
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config
        .params
        .validate()
        .map_err(|e| format!("Invalid parameters in {}: {e}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base))
}
