use crate::util::OutDim;
use serde::{Deserialize, Serialize};

/// Configuration of [`PixelCnn`](super::PixelCnn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PixelCnnConfig {
    /// Number of stacked frames in an observation.
    pub n_stack: i64,

    /// Number of discrete actions, the output dimension of the network.
    pub out_dim: i64,
}

impl OutDim for PixelCnnConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, v: i64) {
        self.out_dim = v;
    }
}
