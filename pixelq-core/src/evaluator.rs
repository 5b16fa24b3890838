//! Evaluation of a trained policy.
use crate::{Env, Policy};
use anyhow::Result;

/// Evaluates a policy.
pub trait Evaluator<E: Env> {
    /// Runs evaluation episodes and returns the mean episode return.
    ///
    /// The caller is expected to switch the policy to evaluation mode before
    /// calling this method.
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<f32>;
}

/// Runs a fixed number of episodes and averages the return.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;

        for _ in 0..self.n_episodes {
            let mut prev_obs = self.env.reset()?;

            loop {
                let act = policy.sample(&prev_obs);
                let step = self.env.step(&act)?;
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator running `n_episodes` episodes per evaluation.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}
