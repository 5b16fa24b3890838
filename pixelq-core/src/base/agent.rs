//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Sets the agent to training mode.
    fn train(&mut self);

    /// Sets the agent to evaluation mode.
    fn eval(&mut self);

    /// Returns `true` in training mode.
    fn is_train(&self) -> bool;

    /// Performs one optimization step.
    ///
    /// A minibatch of transitions is taken from `buffer` and the parameters
    /// of the online estimator are updated by one gradient step. Returns a
    /// [`Record`] with training diagnostics.
    ///
    /// A non-finite loss is reported as an error; the caller must terminate
    /// the run rather than continue with corrupted parameters.
    fn opt(&mut self, buffer: &mut R) -> Result<Record>;

    /// Blends the target estimator parameters toward the online estimator.
    ///
    /// Invoked by the training loop on its own interval; the agent itself
    /// never schedules the sync.
    fn sync(&mut self);

    /// Saves the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files in the directory, one
    /// per estimator.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
