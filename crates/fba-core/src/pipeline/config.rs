use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::deblur::params::{Execution, FbaParams};

/// File-to-file deblurring run, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeblurConfig {
    /// Pre-aligned burst frames, in stack order.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    #[serde(default)]
    pub execution: Execution,
    #[serde(default)]
    pub params: FbaParams,
}

impl Default for DeblurConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from("frame_000.png"), PathBuf::from("frame_001.png")],
            output: PathBuf::from("deblurred.tiff"),
            execution: Execution::default(),
            params: FbaParams::default(),
        }
    }
}
