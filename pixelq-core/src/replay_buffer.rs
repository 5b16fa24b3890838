//! A generic replay buffer for off-policy learning.
//!
//! The buffer stores transitions of arbitrary observation and action types in
//! a fixed-capacity ring and samples uniformly at random with replacement.
//! Decorrelation of the sampled minibatches is the purpose of the buffer, so
//! insertion order is never exposed to the sampler.
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::ReplayBuffer;
pub use batch::{BatchBase, StdTransitionBatch, TransitionBatch};
pub use config::ReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
