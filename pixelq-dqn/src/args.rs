use clap::Parser;
use serde::{Deserialize, Serialize};

/// Train or evaluate a DQN agent on a pixel environment.
#[derive(Clone, Parser, Debug, Serialize, Deserialize)]
#[command(version, about)]
pub struct Args {
    /// "train" or "eval". In evaluation mode, the trained model is loaded.
    #[arg(long, default_value = "train")]
    pub mode: String,

    /// Name of the environment.
    #[arg(long, default_value = "SynthPixels-v0")]
    pub env_id: String,

    /// Random seed.
    #[arg(long, default_value_t = 1)]
    pub seed: i64,

    /// Total number of environment steps.
    #[arg(long, default_value_t = 10_000_000)]
    pub total_timesteps: usize,

    /// Learning rate of the optimizer.
    #[arg(long, default_value_t = 1e-4)]
    pub learning_rate: f64,

    /// Capacity of the replay buffer.
    #[arg(long, default_value_t = 1_000_000)]
    pub buffer_size: usize,

    /// Discount factor.
    #[arg(long, default_value_t = 0.99)]
    pub gamma: f64,

    /// Soft update coefficient of the target network; 1.0 is a hard copy.
    #[arg(long, default_value_t = 1.0)]
    pub tau: f64,

    /// Interval of target network updates in environment steps.
    #[arg(long, default_value_t = 1000)]
    pub target_network_frequency: usize,

    /// Size of sampled minibatches.
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Initial exploration probability.
    #[arg(long, default_value_t = 1.0)]
    pub start_e: f64,

    /// Final exploration probability.
    #[arg(long, default_value_t = 0.01)]
    pub end_e: f64,

    /// Fraction of total timesteps over which exploration decays.
    #[arg(long, default_value_t = 0.10)]
    pub exploration_fraction: f64,

    /// Environment steps before optimization starts.
    #[arg(long, default_value_t = 80_000)]
    pub learning_starts: usize,

    /// Interval of optimization in environment steps.
    #[arg(long, default_value_t = 4)]
    pub train_frequency: usize,

    /// Interval of checkpoints in environment steps.
    #[arg(long, default_value_t = 500_000)]
    pub checkpoint_interval: usize,

    /// Whether the model is saved when training exits.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub save_model: bool,

    /// Whether episode videos are captured. Requires a rendering
    /// environment; the synthetic environment ignores it.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
    pub capture_video: bool,

    /// Whether the torch backend is seeded deterministically.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub torch_deterministic: bool,

    /// Name of the experiment, used in run and checkpoint paths.
    #[arg(long, default_value = "dqn")]
    pub exp_name: String,

    /// Device name. "Cpu" forces the CPU; any other value selects CUDA.
    /// Without this option, CUDA is used when available.
    #[arg(long)]
    pub device: Option<String>,
}
