//! Exploration for DQN.
use serde::{Deserialize, Serialize};
use tch::Tensor;

/// Epsilon-greedy action selection with a linear schedule.
///
/// The exploration probability interpolates linearly from `start_e` at step 0
/// to `end_e` at step `duration` and stays at `end_e` afterwards. The agent
/// calls [`EpsilonGreedy::action`] exactly once per environment step, so the
/// internal counter tracks the global step count.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    t: usize,
    start_e: f64,
    end_e: f64,
    duration: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            t: 0,
            start_e: 1.0,
            end_e: 0.01,
            duration: 100_000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs an epsilon-greedy explorer.
    ///
    /// `duration` is the number of steps over which the exploration
    /// probability decays from `start_e` to `end_e`.
    pub fn new(start_e: f64, end_e: f64, duration: usize) -> Self {
        Self {
            t: 0,
            start_e,
            end_e,
            duration,
        }
    }

    /// The exploration probability after `t` steps.
    ///
    /// Pure in `t` and the three schedule constants. The value never leaves
    /// the interval spanned by `start_e` and `end_e`, in either schedule
    /// direction.
    pub fn eps(&self, t: usize) -> f64 {
        let duration = self.duration.max(1);
        let slope = (self.end_e - self.start_e) / duration as f64;
        let e = self.start_e + slope * t as f64;
        let (lo, hi) = if self.start_e <= self.end_e {
            (self.start_e, self.end_e)
        } else {
            (self.end_e, self.start_e)
        };
        e.clamp(lo, hi)
    }

    /// Chooses between a uniformly random action index and the greedy one.
    ///
    /// `q` holds the action values with shape `[1, n_actions]`; the returned
    /// tensor holds a single action index.
    pub fn action(&mut self, q: &Tensor) -> Tensor {
        let eps = self.eps(self.t);
        self.t += 1;

        if fastrand::f64() < eps {
            let n_actions = q.size()[1] as u32;
            Tensor::from_slice(&[fastrand::u32(..n_actions) as i64])
        } else {
            q.argmax(-1, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EpsilonGreedy;

    #[test]
    fn schedule_stays_within_bounds_and_decreases() {
        let e = EpsilonGreedy::new(1.0, 0.05, 1000);
        let mut prev = f64::INFINITY;
        for t in 0..2000 {
            let eps = e.eps(t);
            assert!((0.05..=1.0).contains(&eps));
            assert!(eps <= prev);
            prev = eps;
        }
    }

    #[test]
    fn schedule_is_clamped_after_the_decay_period() {
        let e = EpsilonGreedy::new(1.0, 0.1, 100);
        assert_eq!(e.eps(0), 1.0);
        assert!((e.eps(50) - 0.55).abs() < 1e-9);
        assert_eq!(e.eps(100), 0.1);
        assert_eq!(e.eps(100_000), 0.1);
    }

    #[test]
    fn increasing_schedules_stay_within_bounds_too() {
        let e = EpsilonGreedy::new(0.1, 0.9, 10);
        for t in 0..100 {
            let eps = e.eps(t);
            assert!((0.1..=0.9).contains(&eps));
        }
        assert_eq!(e.eps(1_000), 0.9);
    }
}
