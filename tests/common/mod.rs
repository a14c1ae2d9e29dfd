#![allow(dead_code)]

pub mod synthetic_log;

use adhesion_analyzer::{SampleLog, SampleView};
use synthetic_log::SyntheticLog;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

impl SyntheticLog {
    pub fn view(&self) -> SampleView<'_> {
        SampleView {
            times: &self.times,
            positions: &self.positions,
            forces: &self.forces,
        }
    }

    pub fn to_sample_log(&self) -> SampleLog {
        SampleLog::new(
            self.times.clone(),
            self.positions.clone(),
            self.forces.clone(),
        )
        .expect("synthetic logs are valid")
    }
}
