//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals are counted in environment steps; every periodic decision of
/// the training loop is modular arithmetic on the step counter.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The total number of environment steps of the run.
    pub total_timesteps: usize,

    /// Number of environment steps before optimization starts, for filling
    /// the replay buffer. Should exceed the batch size by design.
    pub learning_starts: usize,

    /// Interval of optimization steps in environment steps.
    pub train_frequency: usize,

    /// Interval of target network synchronization in environment steps.
    pub target_network_frequency: usize,

    /// Interval of checkpoints in environment steps. Zero disables
    /// checkpointing.
    pub checkpoint_interval: usize,

    /// Number of raw environment episodes that make one reported episode.
    ///
    /// A reporting policy for environments whose raw episodes are a fraction
    /// of a logical one (life-based games set this to the life count).
    pub episodes_per_report_unit: usize,

    /// Interval of progress reports in reported episodes.
    pub report_interval: usize,

    /// Whether the model is saved when the training loop exits.
    pub save_model: bool,

    /// Random seed given to the environment.
    pub seed: i64,

    /// Where to save the trained model.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            total_timesteps: 0,
            learning_starts: 0,
            train_frequency: 1,
            target_network_frequency: 0,
            checkpoint_interval: 0,
            episodes_per_report_unit: 1,
            report_interval: 100,
            save_model: false,
            seed: 0,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the total number of environment steps.
    pub fn total_timesteps(mut self, v: usize) -> Self {
        self.total_timesteps = v;
        self
    }

    /// Sets the warmup period in environment steps.
    pub fn learning_starts(mut self, v: usize) -> Self {
        self.learning_starts = v;
        self
    }

    /// Sets the interval of optimization in environment steps.
    pub fn train_frequency(mut self, v: usize) -> Self {
        self.train_frequency = v;
        self
    }

    /// Sets the interval of target synchronization in environment steps.
    pub fn target_network_frequency(mut self, v: usize) -> Self {
        self.target_network_frequency = v;
        self
    }

    /// Sets the interval of checkpoints in environment steps.
    pub fn checkpoint_interval(mut self, v: usize) -> Self {
        self.checkpoint_interval = v;
        self
    }

    /// Sets the number of raw episodes per reported episode.
    pub fn episodes_per_report_unit(mut self, v: usize) -> Self {
        self.episodes_per_report_unit = v;
        self
    }

    /// Sets the interval of progress reports in reported episodes.
    pub fn report_interval(mut self, v: usize) -> Self {
        self.report_interval = v;
        self
    }

    /// Sets whether the model is saved on exit.
    pub fn save_model(mut self, v: bool) -> Self {
        self.save_model = v;
        self
    }

    /// Sets the random seed given to the environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory where models are saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Constructs [`TrainerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TrainerConfig;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn config_round_trips_through_yaml() -> Result<()> {
        let config = TrainerConfig::default()
            .total_timesteps(10_000_000)
            .learning_starts(80_000)
            .train_frequency(4)
            .target_network_frequency(1000)
            .checkpoint_interval(500_000)
            .save_model(true)
            .model_dir("runs/test");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }
}
