//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, trace, warn};
pub use sampler::{Sampler, StepOutcome};
use std::{path::Path, time::SystemTime};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and the objects it coordinates.
///
/// # Training loop
///
/// Every iteration performs exactly one environment step; all periodic
/// decisions are modular arithmetic on the environment step counter
/// `env_steps` and nothing is gated on wall-clock time:
///
/// 1. Sample an action from the agent (the agent's explorer decides between
///    a random and a greedy action), step the environment and push the
///    resulting transition into the replay buffer.
/// 2. `env_steps += 1`.
/// 3. On episode end, update the episode counters and, at the reporting
///    cadence, write a progress record to the recorder.
/// 4. If `env_steps > learning_starts` and
///    `env_steps % train_frequency == 0`, perform one optimization step on a
///    minibatch sampled from the replay buffer. A non-finite loss aborts the
///    run.
/// 5. If `env_steps % target_network_frequency == 0`, blend the target
///    estimator toward the online estimator.
/// 6. If `env_steps % checkpoint_interval == 0`, write a checkpoint.
///    Checkpoint failures are logged and training continues.
/// 7. If `env_steps == total_timesteps`, finish the loop.
///
/// The exit path always attempts a final model save when `save_model` is set,
/// on the step-budget path as well as on environment or optimization
/// failures, and a failed save never masks the loop outcome.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|TransitionBatch|A
/// ```
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// The total number of environment steps.
    total_timesteps: usize,

    /// Warmup period, for filling the replay buffer, in environment steps.
    learning_starts: usize,

    /// Interval of optimization in environment steps.
    train_frequency: usize,

    /// Interval of target synchronization in environment steps.
    target_network_frequency: usize,

    /// Interval of checkpoints in environment steps.
    checkpoint_interval: usize,

    /// Raw episodes per reported episode.
    episodes_per_report_unit: usize,

    /// Interval of progress reports in reported episodes.
    report_interval: usize,

    /// Whether the model is saved when the loop exits.
    save_model: bool,

    /// Random seed given to the environment.
    seed: i64,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Self {
        Self {
            env_config,
            step_proc_config,
            replay_buffer_config,
            model_dir: config.model_dir,
            total_timesteps: config.total_timesteps,
            learning_starts: config.learning_starts,
            train_frequency: config.train_frequency,
            target_network_frequency: config.target_network_frequency,
            checkpoint_interval: config.checkpoint_interval,
            episodes_per_report_unit: config.episodes_per_report_unit.max(1),
            report_interval: config.report_interval.max(1),
            save_model: config.save_model,
            seed: config.seed,
        }
    }

    fn checkpoint<A: Agent<E, R>>(&self, agent: &A, env_steps: usize) {
        if let Some(model_dir) = &self.model_dir {
            let dir = format!("{}/{}", model_dir, env_steps);
            match agent.save_params(Path::new(&dir)) {
                Ok(()) => info!("Checkpoint saved in {:?}.", dir),
                Err(e) => warn!("Failed to write checkpoint in {:?}: {}", dir, e),
            }
        }
    }

    fn train_loop<A: Agent<E, R>>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
        recorder: &mut dyn Recorder,
        env_steps: &mut usize,
    ) -> Result<()> {
        let start_time = SystemTime::now();
        let mut episodes = 0;
        let mut reported_episodes = 0;

        loop {
            // Environment step and replay insertion
            let outcome = sampler.sample_and_push(agent, buffer)?;
            *env_steps += 1;
            let step = *env_steps;

            // Episode accounting and progress report
            if outcome.is_done {
                episodes += 1;
                if episodes % self.episodes_per_report_unit == 0 {
                    reported_episodes += 1;
                    if reported_episodes % self.report_interval == 0 {
                        let elapsed_min = start_time.elapsed()?.as_secs_f32() / 60.0;
                        recorder.write(Record::from_slice(&[
                            ("step", Scalar(step as f32)),
                            ("episode", Scalar(reported_episodes as f32)),
                            (
                                "episode_return",
                                Scalar(outcome.episode_return.unwrap_or(0.0)),
                            ),
                            ("elapsed_min", Scalar(elapsed_min)),
                        ]));
                    }
                }
            }

            // Optimization step
            if step > self.learning_starts
                && self.train_frequency > 0
                && step % self.train_frequency == 0
            {
                let record = agent.opt(buffer)?;
                if let Ok(loss) = record.get_scalar("loss") {
                    trace!("loss at step {}: {}", step, loss);
                }
            }

            // Target synchronization
            if self.target_network_frequency > 0 && step % self.target_network_frequency == 0 {
                agent.sync();
            }

            // Checkpoint
            if self.checkpoint_interval > 0 && step % self.checkpoint_interval == 0 {
                self.checkpoint(agent, step);
            }

            if step >= self.total_timesteps {
                break;
            }
        }

        Ok(())
    }

    /// Trains the agent until the step budget is exhausted.
    ///
    /// Environment and optimization failures terminate the loop; the final
    /// model save still runs before the error is returned.
    pub fn train<A: Agent<E, R>>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
    ) -> Result<()> {
        let env = E::build(&self.env_config, self.seed)?;
        let step_proc = P::build(&self.step_proc_config);
        let mut buffer = R::build(&self.replay_buffer_config);
        let mut sampler = Sampler::new(env, step_proc);
        let mut env_steps = 0;
        agent.train();

        let result = if self.total_timesteps == 0 {
            Ok(())
        } else {
            self.train_loop(agent, &mut buffer, &mut sampler, recorder, &mut env_steps)
        };

        // Best-effort save on exit; a failed save never masks the loop outcome.
        if self.save_model {
            if let Some(model_dir) = &self.model_dir {
                let dir = format!("{}/model", model_dir);
                match agent.save_params(Path::new(&dir)) {
                    Ok(()) => info!("Saved the model in {:?} at step {}.", dir, env_steps),
                    Err(e) => warn!("Failed to save model in {:?}: {}", dir, e),
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::{Trainer, TrainerConfig};
    use crate::record::{NullRecorder, Record};
    use crate::replay_buffer::{
        BatchBase, ReplayBuffer, ReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    };
    use crate::{Act, Agent, Env, ExperienceBufferBase, Obs, Policy, Step};
    use anyhow::Result;
    use std::path::Path;

    #[derive(Clone, Debug)]
    struct UnitObs;
    impl Obs for UnitObs {}

    #[derive(Clone, Debug)]
    struct UnitAct;
    impl Act for UnitAct {}

    struct UnitColumn;

    impl BatchBase for UnitColumn {
        fn new(_capacity: usize) -> Self {
            UnitColumn
        }
        fn push(&mut self, _ix: usize, _data: Self) {}
        fn sample(&self, _ixs: &Vec<usize>) -> Self {
            UnitColumn
        }
    }

    impl From<UnitObs> for UnitColumn {
        fn from(_obs: UnitObs) -> Self {
            UnitColumn
        }
    }

    impl From<UnitAct> for UnitColumn {
        fn from(_act: UnitAct) -> Self {
            UnitColumn
        }
    }

    /// Truncates every episode after a fixed number of steps.
    struct FixedEpisodeEnv {
        len: usize,
        t: usize,
    }

    impl Env for FixedEpisodeEnv {
        type Config = usize;
        type Obs = UnitObs;
        type Act = UnitAct;
        type Info = ();

        fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self {
                len: *config,
                t: 0,
            })
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.t = 0;
            Ok(UnitObs)
        }

        fn step(&mut self, _a: &Self::Act) -> Result<Step<Self>> {
            self.t += 1;
            let done = self.t == self.len;
            let (final_obs, episode_return) = if done {
                self.t = 0;
                (Some(UnitObs), Some(self.len as f32))
            } else {
                (None, None)
            };
            Ok(Step::new(
                UnitObs,
                UnitAct,
                1.0,
                false,
                done,
                final_obs,
                episode_return,
                (),
            ))
        }
    }

    type TestBuffer = ReplayBuffer<UnitColumn, UnitColumn>;

    #[derive(Default)]
    struct CountingAgent {
        train: bool,
        opts: usize,
        syncs: usize,
    }

    impl Policy<FixedEpisodeEnv> for CountingAgent {
        fn sample(&mut self, _obs: &UnitObs) -> UnitAct {
            UnitAct
        }
    }

    impl Agent<FixedEpisodeEnv, TestBuffer> for CountingAgent {
        fn train(&mut self) {
            self.train = true;
        }

        fn eval(&mut self) {
            self.train = false;
        }

        fn is_train(&self) -> bool {
            self.train
        }

        fn opt(&mut self, buffer: &mut TestBuffer) -> Result<Record> {
            assert!(!buffer.is_empty());
            self.opts += 1;
            Ok(Record::from_scalar("loss", 0.0))
        }

        fn sync(&mut self) {
            self.syncs += 1;
        }

        fn save_params(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn periodic_decisions_follow_the_step_counter() {
        let config = TrainerConfig::default()
            .total_timesteps(100)
            .learning_starts(10)
            .train_frequency(4)
            .target_network_frequency(20);
        let mut trainer = Trainer::<
            FixedEpisodeEnv,
            SimpleStepProcessor<FixedEpisodeEnv, UnitColumn, UnitColumn>,
            TestBuffer,
        >::build(
            config,
            5,
            SimpleStepProcessorConfig {},
            ReplayBufferConfig::default(),
        );
        let mut agent = CountingAgent::default();
        let mut recorder = NullRecorder {};

        trainer.train(&mut agent, &mut recorder).unwrap();

        // opt at steps 12, 16, ..., 100; sync at 20, 40, ..., 100
        assert_eq!(agent.opts, 23);
        assert_eq!(agent.syncs, 5);
        assert!(agent.is_train());
    }
}
