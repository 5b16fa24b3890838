//! Ring-buffer implementation of experience replay.
use super::{BatchBase, ReplayBufferConfig, StdTransitionBatch, TransitionBatch};
use crate::{ExperienceBufferBase, ReplayBufferBase};
use anyhow::{bail, Result};
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A fixed-capacity replay buffer storing transitions in a ring.
///
/// The buffer grows until `capacity` and then overwrites the oldest entries.
/// [`ReplayBufferBase::batch`] samples uniformly at random with replacement
/// over the valid entries; a batch larger than the current size is defined
/// behavior (rows repeat), callers gate sampling on a warmup period instead.
///
/// The buffer lives only for the duration of the process; it is never
/// persisted.
pub struct ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    capacity: usize,
    i: usize,
    size: usize,
    obs: O,
    act: A,
    next_obs: O,
    reward: Vec<f32>,
    is_done: Vec<i8>,
    rng: StdRng,
}

impl<O, A> ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    #[inline]
    fn push_reward(&mut self, i: usize, b: &[f32]) {
        let mut j = i;
        for r in b.iter() {
            self.reward[j] = *r;
            j += 1;
            if j == self.capacity {
                j = 0;
            }
        }
    }

    #[inline]
    fn push_is_done(&mut self, i: usize, b: &[i8]) {
        let mut j = i;
        for d in b.iter() {
            self.is_done[j] = *d;
            j += 1;
            if j == self.capacity {
                j = 0;
            }
        }
    }

    fn sample_reward(&self, ixs: &[usize]) -> Vec<f32> {
        ixs.iter().map(|ix| self.reward[*ix]).collect()
    }

    fn sample_is_done(&self, ixs: &[usize]) -> Vec<i8> {
        ixs.iter().map(|ix| self.is_done[*ix]).collect()
    }

    /// The maximum number of transitions the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<O, A> ExperienceBufferBase for ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = StdTransitionBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    /// Pushes a transition, overwriting the oldest entry once at capacity.
    ///
    /// This operation never fails; the storage is pre-allocated.
    fn push(&mut self, tr: Self::Item) -> Result<()> {
        let len = tr.len();
        let (obs, act, next_obs, reward, is_done) = tr.unpack();
        self.obs.push(self.i, obs);
        self.act.push(self.i, act);
        self.next_obs.push(self.i, next_obs);
        self.push_reward(self.i, &reward);
        self.push_is_done(self.i, &is_done);

        self.i = (self.i + len) % self.capacity;
        self.size += len;
        if self.size >= self.capacity {
            self.size = self.capacity;
        }

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = ReplayBufferConfig;
    type Batch = StdTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity;
        Self {
            capacity,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_done: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if self.size == 0 {
            bail!("cannot sample from an empty replay buffer");
        }

        let ixs = (0..size)
            .map(|_| (self.rng.next_u32() as usize) % self.size)
            .collect::<Vec<_>>();

        Ok(Self::Batch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: self.sample_reward(&ixs),
            is_done: self.sample_is_done(&ixs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Column of scalar ids, enough to track which rows survive.
    struct IdColumn(Vec<i64>);

    impl BatchBase for IdColumn {
        fn new(capacity: usize) -> Self {
            Self(vec![0; capacity])
        }

        fn push(&mut self, ix: usize, data: Self) {
            let capacity = self.0.len();
            for (k, v) in data.0.iter().enumerate() {
                self.0[(ix + k) % capacity] = *v;
            }
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            Self(ixs.iter().map(|ix| self.0[*ix]).collect())
        }
    }

    fn transition(id: i64) -> StdTransitionBatch<IdColumn, IdColumn> {
        StdTransitionBatch {
            obs: IdColumn(vec![id]),
            act: IdColumn(vec![id]),
            next_obs: IdColumn(vec![id]),
            reward: vec![id as f32],
            is_done: vec![0],
        }
    }

    fn build(capacity: usize) -> ReplayBuffer<IdColumn, IdColumn> {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity))
    }

    #[test]
    fn sampling_returns_only_inserted_entries() {
        let mut buffer = build(10);
        for id in 0..5 {
            buffer.push(transition(id)).unwrap();
        }
        assert_eq!(buffer.len(), 5);

        let batch = buffer.batch(64).unwrap();
        for id in batch.obs.0 {
            assert!((0..5).contains(&id));
        }
    }

    #[test]
    fn oldest_entry_is_overwritten_at_capacity() {
        let mut buffer = build(4);
        for id in 0..5 {
            buffer.push(transition(id)).unwrap();
        }
        assert_eq!(buffer.len(), 4);

        let batch = buffer.batch(256).unwrap();
        for id in &batch.obs.0 {
            assert_ne!(*id, 0, "the oldest entry must not be retrievable");
        }
        // rows stay aligned across columns
        let rewards = batch.reward;
        for (id, r) in batch.next_obs.0.iter().zip(rewards.iter()) {
            assert_eq!(*id as f32, *r);
        }
    }

    #[test]
    fn sampling_from_an_empty_buffer_is_an_error() {
        let mut buffer = build(4);
        assert!(buffer.batch(1).is_err());
    }
}
