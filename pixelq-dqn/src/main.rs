mod args;
mod config;

use anyhow::Result;
use args::Args;
use clap::Parser;
use config::DqnPixelConfig;
use log::{info, warn};
use pixelq_core::{
    record::TextRecorder, Agent, Configurable, Env as _, Evaluator as _, Trainer,
};
use pixelq_dqn::types::{Dqn, Env, Evaluator, ReplayBuffer, StepProc};
use std::{fs, path::Path};

fn create_agent(config: &DqnPixelConfig) -> Result<Dqn> {
    // The action set must be discrete and non-empty; the environment reports
    // its size here, before any stepping begins.
    let n_actions = Env::build(&config.env_config, config.args.seed)?.n_actions();
    let agent_config = config.agent_config.clone().out_dim(n_actions);
    Ok(Dqn::build(agent_config))
}

fn save_run_config(config: &DqnPixelConfig) -> Result<()> {
    let model_dir = config.model_dir();
    fs::create_dir_all(&model_dir)?;
    let path = format!("{}/config.json", model_dir);
    fs::write(&path, serde_json::to_string_pretty(config)?)?;
    info!("Run configuration written to {}", path);
    Ok(())
}

fn train(config: &DqnPixelConfig) -> Result<()> {
    save_run_config(config)?;

    let mut trainer = Trainer::<Env, StepProc, ReplayBuffer>::build(
        config.trainer_config.clone(),
        config.env_config.clone(),
        Default::default(),
        config.replay_buffer_config.clone(),
    );
    let mut agent = create_agent(config)?;
    let mut recorder = TextRecorder::new("training_log.txt");

    trainer.train(&mut agent, &mut recorder)
}

fn eval(config: &DqnPixelConfig) -> Result<()> {
    let mut agent = create_agent(config)?;
    let model_dir = format!("{}/model", config.model_dir());
    agent.load_params(Path::new(&model_dir))?;
    agent.eval();

    let mut evaluator = Evaluator::new(&config.env_config, config.args.seed, 5)?;
    let episode_return = evaluator.evaluate(&mut agent)?;
    info!("Mean episode return: {}", episode_return);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config: DqnPixelConfig = Args::parse().into();

    if config.args.torch_deterministic {
        tch::manual_seed(config.args.seed);
    }
    fastrand::seed(config.args.seed as u64);

    if config.args.capture_video {
        warn!("video capture requires a rendering environment; the synthetic environment does not record");
    }

    match config.args.mode.as_str() {
        "train" => train(&config)?,
        "eval" => eval(&config)?,
        _ => panic!("mode must be either 'train' or 'eval'"),
    }

    Ok(())
}
