//! Conversion of environment steps into stored transitions.
use super::{BatchBase, StdTransitionBatch};
use crate::{Env, Step, StepProcessor};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug)]
pub struct SimpleStepProcessorConfig {}

impl Default for SimpleStepProcessorConfig {
    fn default() -> Self {
        Self {}
    }
}

/// Produces 1-step transitions `(o_t, a_t, o_t+1, r_t, done_t)` from steps.
///
/// The processor keeps the previous observation `o_t`, while the remaining
/// elements come from the given [`Step`]. For a step that ends the episode,
/// the stored `o_t+1` is the terminal observation carried in
/// [`Step::final_obs`], never the observation of the auto-reset state; the
/// reset observation instead becomes the `o_t` of the next episode's first
/// transition.
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = StdTransitionBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    fn process(&mut self, step: Step<E>) -> Self::Output {
        let is_done = step.is_done();

        let next_obs = if is_done {
            step.final_obs
                .expect("a terminal step must carry the pre-reset observation")
                .into()
        } else {
            step.obs.clone().into()
        };

        // step.obs is the initial observation of the next episode when done
        let obs = self
            .prev_obs
            .replace(step.obs.into())
            .expect("prev_obs is not set. Forgot to call reset()?");

        StdTransitionBatch {
            obs,
            act: step.act.into(),
            next_obs,
            reward: vec![step.reward],
            is_done: vec![is_done as i8],
        }
    }
}
