use anyhow::Result;
use pixelq_core::{
    record::NullRecorder, replay_buffer::ReplayBufferConfig, Agent, Configurable, Env as _,
    Policy, Trainer, TrainerConfig,
};
use pixelq_dqn::{
    env::{FrameObs, SynthEnv, SynthEnvConfig},
    types::{Dqn, ReplayBuffer, StepProc},
};
use pixelq_tch_agent::{
    cnn::{PixelCnn, PixelCnnConfig},
    dqn::{DqnConfig, DqnModel, DqnModelConfig, EpsilonGreedy},
    opt::OptimizerConfig,
    Device, ModelBase,
};
use std::path::Path;
use tempdir::TempDir;

fn model_config(lr: f64, n_actions: i64) -> DqnModelConfig<PixelCnnConfig> {
    DqnModelConfig::default()
        .q_config(PixelCnnConfig {
            n_stack: 4,
            out_dim: n_actions,
        })
        .opt_config(OptimizerConfig::Adam { lr })
}

fn agent_config(gamma: f64, lr: f64, n_actions: i64) -> DqnConfig<PixelCnn> {
    DqnConfig::default()
        .model_config(model_config(lr, n_actions))
        .batch_size(32)
        .discount_factor(gamma)
        .tau(1.0)
        .explorer(EpsilonGreedy::new(1.0, 0.05, 500))
        .device(Device::Cpu)
}

/// Loads a saved online network and returns its best action value for `obs`.
fn probe_max_q(lr: f64, n_actions: i64, params_dir: &Path, obs: &FrameObs) -> f32 {
    let mut model = DqnModel::<PixelCnn>::build(model_config(lr, n_actions), tch::Device::Cpu);
    model.load(params_dir.join("qnet.pt")).unwrap();
    let q = model.forward(&obs.clone().into());
    f32::from(&q.max())
}

/// With a constant reward and no action effect, the optimal value is
/// `reward / (1 - gamma)`; training on the synthetic environment must move
/// the estimates toward that fixed point.
#[test]
fn value_estimates_converge_toward_the_fixed_point() -> Result<()> {
    tch::manual_seed(42);
    fastrand::seed(42);

    let gamma = 0.5;
    let lr = 1e-2;
    let fixed_point = 1.0f32 / (1.0 - gamma as f32);
    // the episode outlasts the step budget, so done stays false throughout
    let env_config = SynthEnvConfig::default().n_actions(2).episode_len(2000);

    let trainer_config = TrainerConfig::default()
        .total_timesteps(1000)
        .learning_starts(100)
        .train_frequency(4)
        .target_network_frequency(50)
        .seed(7);
    let mut trainer = Trainer::<SynthEnv, StepProc, ReplayBuffer>::build(
        trainer_config,
        env_config.clone(),
        Default::default(),
        ReplayBufferConfig::default().capacity(1000).seed(7),
    );

    let mut agent: Dqn = Dqn::build(agent_config(gamma, lr, 2));

    let mut probe_env = SynthEnv::build(&env_config, 7)?;
    let obs = probe_env.reset()?;

    let dir = TempDir::new("dqn_synth")?;
    let before_dir = dir.path().join("before");
    let after_dir = dir.path().join("after");

    agent.save_params(&before_dir)?;
    let q_before = probe_max_q(lr, 2, &before_dir, &obs);

    let mut recorder = NullRecorder {};
    trainer.train(&mut agent, &mut recorder)?;

    agent.save_params(&after_dir)?;
    let q_after = probe_max_q(lr, 2, &after_dir, &obs);

    assert!(q_after.is_finite());
    assert!(
        (q_after - fixed_point).abs() < (q_before - fixed_point).abs(),
        "value estimate did not move toward {}: before {}, after {}",
        fixed_point,
        q_before,
        q_after
    );
    assert!(
        q_after > 0.8 && q_after < 3.2,
        "value estimate far from the fixed point {}: {}",
        fixed_point,
        q_after
    );

    Ok(())
}

#[test]
fn checkpoints_round_trip_into_a_fresh_agent() -> Result<()> {
    tch::manual_seed(7);
    fastrand::seed(7);

    let mut agent: Dqn = Dqn::build(agent_config(0.99, 1e-4, 4));
    let dir = TempDir::new("dqn_ckpt")?;
    agent.save_params(dir.path())?;

    let mut restored: Dqn = Dqn::build(agent_config(0.99, 1e-4, 4));
    restored.load_params(dir.path())?;

    agent.eval();
    restored.eval();

    let env_config = SynthEnvConfig::default().n_actions(4);
    let mut env = SynthEnv::build(&env_config, 3)?;
    let mut obs = env.reset()?;
    for _ in 0..8 {
        let a = agent.sample(&obs);
        let b = restored.sample(&obs);
        assert_eq!(a, b);
        obs = env.step(&a)?.obs;
    }

    Ok(())
}
