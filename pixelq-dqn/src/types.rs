//! Type aliases wiring the environment, the replay buffer and the agent.
use crate::env::{DiscreteAct, FrameObs, SynthEnv, SynthEnvConfig};
use pixelq_core::{replay_buffer::SimpleStepProcessor, DefaultEvaluator};
use pixelq_tch_agent::{cnn::PixelCnn, dqn::Dqn as Dqn_, TensorBatch};

/// Observation type.
pub type Obs = FrameObs;

/// Action type.
pub type Act = DiscreteAct;

/// Column storage for observations.
pub type ObsBatch = TensorBatch;

/// Column storage for actions.
pub type ActBatch = TensorBatch;

/// Environment configuration.
pub type EnvConfig = SynthEnvConfig;

/// Environment.
pub type Env = SynthEnv;

/// Step processor producing 1-step transitions.
pub type StepProc = SimpleStepProcessor<Env, ObsBatch, ActBatch>;

/// Replay buffer.
pub type ReplayBuffer = pixelq_core::replay_buffer::ReplayBuffer<ObsBatch, ActBatch>;

/// The DQN agent.
pub type Dqn = Dqn_<Env, PixelCnn, ReplayBuffer>;

/// Evaluator running greedy episodes.
pub type Evaluator = DefaultEvaluator<Env>;
