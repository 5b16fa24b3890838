//! Environment.
use super::{Act, Info, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP with a discrete action set.
///
/// The environment resets itself when an episode ends; see [`Env::step`].
pub trait Env {
    /// Configuration of the environment.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation of an episode.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step.
    ///
    /// When the episode ends at this step, the environment resets itself:
    /// [`Step::obs`] is then the initial observation of the next episode,
    /// while [`Step::final_obs`] carries the observation of the terminal
    /// state and [`Step::episode_return`] the return of the finished episode.
    ///
    /// Step failures are unrecoverable; the caller is expected to terminate
    /// the interaction loop.
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;
}
