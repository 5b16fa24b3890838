//! Configuration of the DQN agent.
use super::{explorer::EpsilonGreedy, DqnModelConfig};
use crate::{model::SubModel, util::OutDim, Device};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};
use tch::Tensor;

/// Configuration of [`Dqn`](super::Dqn).
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(bound = "Q::Config: DeserializeOwned + Serialize")]
pub struct DqnConfig<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Configuration of the Q-network model and its optimizer.
    pub model_config: DqnModelConfig<Q::Config>,

    /// Size of sampled minibatches.
    pub batch_size: usize,

    /// Discount factor.
    pub discount_factor: f64,

    /// Soft update coefficient; `1.0` means a hard copy.
    pub tau: f64,

    /// Whether the agent starts in training mode.
    pub train: bool,

    /// The epsilon-greedy explorer.
    pub explorer: EpsilonGreedy,

    /// Device on which the networks are built.
    pub device: Option<Device>,

    phantom: PhantomData<Q>,
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            batch_size: self.batch_size,
            discount_factor: self.discount_factor,
            tau: self.tau,
            train: self.train,
            explorer: self.explorer.clone(),
            device: self.device,
            phantom: PhantomData,
        }
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            batch_size: 32,
            discount_factor: 0.99,
            tau: 1.0,
            train: false,
            explorer: EpsilonGreedy::default(),
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the soft update coefficient.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Sets the explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<Q::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the output dimension of the model, the number of actions.
    pub fn out_dim(mut self, v: i64) -> Self {
        self.model_config = self.model_config.out_dim(v);
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Constructs [`DqnConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
