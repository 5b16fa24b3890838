use crate::args::Args;
use pixelq_core::{replay_buffer::ReplayBufferConfig, TrainerConfig};
use pixelq_dqn::types::EnvConfig;
use pixelq_tch_agent::{
    cnn::{PixelCnn, PixelCnnConfig},
    dqn::{DqnConfig, DqnModelConfig, EpsilonGreedy},
    opt::OptimizerConfig,
    Device,
};
use serde::Serialize;

/// Aggregated configuration of a run, assembled from the argument surface.
#[derive(Clone, Serialize)]
pub struct DqnPixelConfig {
    pub args: Args,
    pub env_config: EnvConfig,
    pub replay_buffer_config: ReplayBufferConfig,
    pub agent_config: DqnConfig<PixelCnn>,
    pub trainer_config: TrainerConfig,
}

impl From<Args> for DqnPixelConfig {
    fn from(args: Args) -> DqnPixelConfig {
        let env_config = EnvConfig::default().name(args.env_id.clone());
        let replay_buffer_config = create_replay_buffer_config(&args);
        let agent_config = create_agent_config(&args);
        let trainer_config = create_trainer_config(&args);

        DqnPixelConfig {
            args,
            env_config,
            replay_buffer_config,
            agent_config,
            trainer_config,
        }
    }
}

impl DqnPixelConfig {
    /// The run identifier, `<env_id>__<exp_name>__<seed>`.
    pub fn run_name(&self) -> String {
        run_name(&self.args)
    }

    /// The directory holding checkpoints and the final model of this run.
    pub fn model_dir(&self) -> String {
        model_dir(&self.args)
    }
}

fn run_name(args: &Args) -> String {
    format!("{}__{}__{}", args.env_id, args.exp_name, args.seed)
}

fn model_dir(args: &Args) -> String {
    format!("runs/{}", run_name(args))
}

fn create_replay_buffer_config(args: &Args) -> ReplayBufferConfig {
    ReplayBufferConfig::default()
        .capacity(args.buffer_size)
        .seed(args.seed as u64)
}

fn create_agent_config(args: &Args) -> DqnConfig<PixelCnn> {
    let device = match &args.device {
        Some(device) => match device.as_str() {
            "Cpu" => Device::Cpu,
            _ => Device::Cuda(0),
        },
        None => Device::from(tch::Device::cuda_if_available()),
    };
    let duration = (args.exploration_fraction * args.total_timesteps as f64) as usize;

    DqnConfig::default()
        .model_config(
            DqnModelConfig::default()
                .q_config(PixelCnnConfig {
                    n_stack: 4,
                    // set from the environment's action set before building
                    out_dim: 0,
                })
                .opt_config(OptimizerConfig::Adam {
                    lr: args.learning_rate,
                }),
        )
        .batch_size(args.batch_size)
        .discount_factor(args.gamma)
        .tau(args.tau)
        .explorer(EpsilonGreedy::new(args.start_e, args.end_e, duration))
        .device(device)
}

fn create_trainer_config(args: &Args) -> TrainerConfig {
    TrainerConfig::default()
        .total_timesteps(args.total_timesteps)
        .learning_starts(args.learning_starts)
        .train_frequency(args.train_frequency)
        .target_network_frequency(args.target_network_frequency)
        .checkpoint_interval(args.checkpoint_interval)
        .report_interval(100)
        .save_model(args.save_model)
        .seed(args.seed)
        .model_dir(model_dir(args))
}
