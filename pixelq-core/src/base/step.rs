//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {}

impl Info for () {}

/// Represents the outcome of a single environment step.
///
/// An environment emits a [`Step`] object at every interaction step.
/// This object is used to create transitions `(o_t, a_t, o_t+1, r_t)`.
pub struct Step<E: Env> {
    /// Action applied at this step.
    pub act: E::Act,

    /// Observation after the step.
    ///
    /// If the episode ended at this step, the environment has already reset
    /// and this is the initial observation of the next episode.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode reached a terminal state.
    pub is_terminated: bool,

    /// Flag denoting if the episode was truncated.
    pub is_truncated: bool,

    /// Observation of the terminal state, before the automatic reset.
    ///
    /// `Some` if and only if the episode ended at this step. Environments
    /// that reset automatically must supply this so that stored transitions
    /// keep the true terminal observation.
    pub final_obs: Option<E::Obs>,

    /// Return of the finished episode; `Some` when the episode ended.
    pub episode_return: Option<f32>,

    /// Information defined by the user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        final_obs: Option<E::Obs>,
        episode_return: Option<f32>,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            final_obs,
            episode_return,
            info,
        }
    }

    /// Terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}

/// Processes [`Step`] objects and outputs items for an experience buffer.
///
/// A [`Step`] object is transformed into [`Self::Output`], which will be
/// pushed into a replay buffer implementing
/// [`ExperienceBufferBase`](crate::ExperienceBufferBase).
/// The type [`Self::Output`] should be the same as
/// [`ExperienceBufferBase::Item`](crate::ExperienceBufferBase::Item).
pub trait StepProcessor<E: Env> {
    /// Configuration.
    type Config: Clone;

    /// The type of transitions produced by this processor.
    type Output;

    /// Builds a processor.
    fn build(config: &Self::Config) -> Self;

    /// Resets the processor with the initial observation of an episode.
    fn reset(&mut self, init_obs: E::Obs);

    /// Processes a [`Step`] object into a transition.
    fn process(&mut self, step: Step<E>) -> Self::Output;
}
