//! Replay buffer interfaces.
use anyhow::Result;

/// Interface for buffers that store experiences from an environment.
pub trait ExperienceBufferBase {
    /// Items in the buffer.
    type Item;

    /// Pushes an experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// The number of experiences currently in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer contains no experiences.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
///
/// Batch generation is independent of [`ExperienceBufferBase`]: the sampler
/// never observes insertion order, which is the point of experience replay.
pub trait ReplayBufferBase {
    /// Configuration of the buffer.
    type Config: Clone;

    /// Batches generated for training.
    type Batch;

    /// Builds a replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Self;

    /// Samples a batch of experiences for training.
    ///
    /// Sampling is uniform with replacement over the valid entries and
    /// requires at least one entry in the buffer.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
