//! Transition batches.

/// A trait defining basic operations of a column of batched data.
///
/// Implementations store observations or actions for many transitions and
/// are indexed in lockstep with the other columns of the owning buffer.
pub trait BatchBase {
    /// Creates a new column with the given capacity.
    fn new(capacity: usize) -> Self;

    /// Adds data at the given index, wrapping around at the capacity.
    fn push(&mut self, ix: usize, data: Self);

    /// Retrieves the rows at the given indices.
    fn sample(&self, ixs: &Vec<usize>) -> Self;
}

/// A batch of transitions, aligned by index across all fields.
///
/// The row `i` of each field belongs to the same transition: `obs[i]` pairs
/// with `act[i]`, `reward[i]`, `next_obs[i]` and `is_done[i]`.
pub trait TransitionBatch {
    /// A batch of observations.
    type ObsBatch: BatchBase;

    /// A batch of actions.
    type ActBatch: BatchBase;

    /// Unpacks the batch into `(obs, act, next_obs, reward, is_done)`.
    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
    );

    /// The number of transitions in the batch.
    fn len(&self) -> usize;

    /// Returns `true` if the batch contains no transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The standard transition batch, generic in observation and action columns.
pub struct StdTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Observations before the step.
    pub obs: O,

    /// Actions taken.
    pub act: A,

    /// Observations after the step.
    ///
    /// For a transition whose episode ended, this is the true terminal
    /// observation, never the observation of a reset state.
    pub next_obs: O,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Flags denoting episode end (terminated or truncated).
    pub is_done: Vec<i8>,
}

impl<O, A> TransitionBatch for StdTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
    ) {
        (self.obs, self.act, self.next_obs, self.reward, self.is_done)
    }

    fn len(&self) -> usize {
        self.reward.len()
    }
}
