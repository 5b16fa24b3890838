//! Environment interaction step.
use crate::{Env, ExperienceBufferBase, Policy, StepProcessor};
use anyhow::Result;

/// Outcome of one environment interaction step, as seen by the trainer.
pub struct StepOutcome {
    /// True if the episode ended at this step.
    pub is_done: bool,

    /// Return of the finished episode, when the episode ended.
    pub episode_return: Option<f32>,
}

/// Samples experiences from the environment and pushes them to a buffer.
///
/// One call to [`Sampler::sample_and_push`] performs exactly one environment
/// step: the policy chooses an action, the environment advances, the step is
/// converted into a transition and the transition is stored. All of this runs
/// on the caller's thread; sampling never observes a partially written
/// transition.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler from an environment and a step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
        }
    }

    /// Performs one environment step and pushes the transition to `buffer`.
    ///
    /// The environment is reset lazily before the first step. Environment
    /// failures propagate; the interaction loop is not expected to recover
    /// mid-episode from a broken environment.
    pub fn sample_and_push<R>(
        &mut self,
        policy: &mut dyn Policy<E>,
        buffer: &mut R,
    ) -> Result<StepOutcome>
    where
        R: ExperienceBufferBase<Item = P::Output>,
    {
        if self.prev_obs.is_none() {
            let init_obs = self.env.reset()?;
            self.step_processor.reset(init_obs.clone());
            self.prev_obs = Some(init_obs);
        }

        let act = policy.sample(self.prev_obs.as_ref().unwrap());
        let step = self.env.step(&act)?;
        let outcome = StepOutcome {
            is_done: step.is_done(),
            episode_return: step.episode_return,
        };

        // step.obs is already the next episode's initial observation when the
        // episode ended (the environment resets itself)
        self.prev_obs = Some(step.obs.clone());

        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        Ok(outcome)
    }
}
