//! A deterministic synthetic pixel environment.
//!
//! A real emulator wrapper (frame skipping, resizing, grayscale, stacking) is
//! an external collaborator of the training system. This module provides a
//! deterministic stand-in that implements the same contract: stacked `u8`
//! frames, and auto-reset on episode end with the pre-reset terminal
//! observation and the episodic return surfaced in the step.
use anyhow::{bail, Result};
use pixelq_core::{error::PixelqError, Act, Env, Obs, Step};
use pixelq_tch_agent::TensorBatch;
use serde::{Deserialize, Serialize};
use tch::Tensor;

/// Number of stacked frames in an observation.
pub const N_STACK: i64 = 4;

/// Side length of a frame in pixels.
pub const FRAME_SIZE: i64 = 84;

/// A stacked-frame pixel observation.
#[derive(Clone, Debug)]
pub struct FrameObs {
    /// Raw pixel intensities, `N_STACK * FRAME_SIZE * FRAME_SIZE` bytes.
    ///
    /// Intensities are stored unnormalized; scaling to `[0, 1]` happens
    /// inside the estimator.
    pub frames: Vec<u8>,
}

impl Obs for FrameObs {}

impl From<FrameObs> for Tensor {
    fn from(obs: FrameObs) -> Tensor {
        Tensor::from_slice(&obs.frames).view([1, N_STACK, FRAME_SIZE, FRAME_SIZE])
    }
}

impl From<FrameObs> for TensorBatch {
    fn from(obs: FrameObs) -> Self {
        TensorBatch::from_tensor(obs.into())
    }
}

/// An index into the discrete action set.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteAct(pub i64);

impl Act for DiscreteAct {}

impl From<Tensor> for DiscreteAct {
    fn from(t: Tensor) -> Self {
        Self(t.int64_value(&[0]))
    }
}

impl From<DiscreteAct> for Tensor {
    fn from(act: DiscreteAct) -> Tensor {
        Tensor::from_slice(&[act.0]).view([1, 1])
    }
}

impl From<DiscreteAct> for TensorBatch {
    fn from(act: DiscreteAct) -> Self {
        TensorBatch::from_tensor(act.into())
    }
}

/// Configuration of [`SynthEnv`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthEnvConfig {
    /// Name tag of the environment variant.
    pub name: String,

    /// Number of discrete actions.
    pub n_actions: i64,

    /// Steps per episode; episodes end by truncation.
    pub episode_len: usize,

    /// Reward paid at every step.
    pub reward: f32,
}

impl Default for SynthEnvConfig {
    fn default() -> Self {
        Self {
            name: "SynthPixels-v0".to_string(),
            n_actions: 6,
            episode_len: 1000,
            reward: 1.0,
        }
    }
}

impl SynthEnvConfig {
    /// Sets the name tag.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of discrete actions.
    pub fn n_actions(mut self, v: i64) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the episode length.
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }

    /// Sets the per-step reward.
    pub fn reward(mut self, v: f32) -> Self {
        self.reward = v;
        self
    }
}

/// A deterministic synthetic pixel environment.
///
/// Emits near-constant frames derived from a step counter, pays a constant
/// reward and truncates every episode after a fixed number of steps. On
/// episode end the environment resets itself; the step carries the pre-reset
/// terminal observation and the episodic return.
pub struct SynthEnv {
    n_actions: i64,
    episode_len: usize,
    reward: f32,
    t: usize,
    frame_counter: u64,
    acc_return: f32,
}

impl SynthEnv {
    /// The size of the discrete action set.
    pub fn n_actions(&self) -> i64 {
        self.n_actions
    }

    fn observe(&self) -> FrameObs {
        let value = 96u8.wrapping_add((self.frame_counter % 8) as u8);
        FrameObs {
            frames: vec![value; (N_STACK * FRAME_SIZE * FRAME_SIZE) as usize],
        }
    }
}

impl Env for SynthEnv {
    type Config = SynthEnvConfig;
    type Obs = FrameObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.n_actions < 1 {
            return Err(PixelqError::InvalidActionSpace(format!(
                "n_actions must be positive, got {}",
                config.n_actions
            ))
            .into());
        }
        if config.episode_len == 0 {
            bail!("episode_len must be positive");
        }

        Ok(Self {
            n_actions: config.n_actions,
            episode_len: config.episode_len,
            reward: config.reward,
            t: 0,
            frame_counter: seed as u64,
            acc_return: 0.0,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        self.acc_return = 0.0;
        Ok(self.observe())
    }

    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>> {
        if a.0 < 0 || a.0 >= self.n_actions {
            bail!(
                "action {} is outside the action set [0, {})",
                a.0,
                self.n_actions
            );
        }

        self.t += 1;
        self.frame_counter += 1;
        self.acc_return += self.reward;

        let is_truncated = self.t >= self.episode_len;
        let (final_obs, episode_return) = if is_truncated {
            let terminal = self.observe();
            let episode_return = self.acc_return;
            self.t = 0;
            self.frame_counter += 1;
            self.acc_return = 0.0;
            (Some(terminal), Some(episode_return))
        } else {
            (None, None)
        };

        Ok(Step::new(
            self.observe(),
            a.clone(),
            self.reward,
            false,
            is_truncated,
            final_obs,
            episode_return,
            (),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscreteAct, SynthEnv, SynthEnvConfig};
    use pixelq_core::Env;

    fn config() -> SynthEnvConfig {
        SynthEnvConfig::default().n_actions(3).episode_len(4)
    }

    #[test]
    fn an_empty_action_set_is_rejected_at_build() {
        let config = SynthEnvConfig::default().n_actions(0);
        assert!(SynthEnv::build(&config, 0).is_err());
    }

    #[test]
    fn out_of_range_actions_are_step_errors() {
        let mut env = SynthEnv::build(&config(), 0).unwrap();
        env.reset().unwrap();
        assert!(env.step(&DiscreteAct(3)).is_err());
        assert!(env.step(&DiscreteAct(-1)).is_err());
        assert!(env.step(&DiscreteAct(2)).is_ok());
    }

    #[test]
    fn episode_end_carries_terminal_observation_and_return() {
        let mut env = SynthEnv::build(&config(), 0).unwrap();
        env.reset().unwrap();

        for _ in 0..3 {
            let step = env.step(&DiscreteAct(0)).unwrap();
            assert!(!step.is_done());
            assert!(step.final_obs.is_none());
            assert!(step.episode_return.is_none());
        }

        let step = env.step(&DiscreteAct(0)).unwrap();
        assert!(step.is_done());
        let terminal = step.final_obs.expect("terminal observation");
        assert_ne!(terminal.frames[0], step.obs.frames[0]);
        assert_eq!(step.episode_return, Some(4.0));
    }
}
