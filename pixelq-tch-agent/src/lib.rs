#![warn(missing_docs)]
//! DQN agent for [pixelq](https://crates.io/crates/pixelq-core) based on tch-rs.
pub mod cnn;
pub mod dqn;
mod model;
pub use model::{ModelBase, SubModel};
pub mod opt;
mod tensor_batch;
pub use tensor_batch::TensorBatch;
pub mod util;

use serde::{Deserialize, Serialize};

/// Device for tensor computation, a serializable counterpart of [`tch::Device`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// A CUDA device with its ordinal.
    Cuda(usize),
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Self::Cpu,
            tch::Device::Cuda(n) => Self::Cuda(n),
            _ => unimplemented!("unsupported device"),
        }
    }
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => Self::Cpu,
            Device::Cuda(n) => Self::Cuda(n),
        }
    }
}
