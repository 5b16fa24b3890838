//! Action-value model of the DQN agent.
use crate::{
    model::{ModelBase, SubModel},
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;
use tch::{nn, Device, Tensor};

/// Configuration of [`DqnModel`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnModelConfig<Q> {
    /// Configuration of the Q-network.
    pub q_config: Option<Q>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q> {
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::Adam { lr: 1e-4 },
        }
    }
}

impl<Q: OutDim> DqnModelConfig<Q> {
    /// Sets the configuration of the Q-network.
    pub fn q_config(mut self, q_config: Q) -> Self {
        self.q_config = Some(q_config);
        self
    }

    /// Sets the configuration of the optimizer.
    pub fn opt_config(mut self, opt_config: OptimizerConfig) -> Self {
        self.opt_config = opt_config;
        self
    }

    /// Sets the output dimension of the Q-network.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        if let Some(q_config) = &mut self.q_config {
            q_config.set_out_dim(out_dim);
        }
        self
    }
}

/// Represents a value function for DQN agents.
///
/// The model owns its parameters in a [`nn::VarStore`]; cloning builds a new
/// store of identical architecture and deep-copies the parameters into it, so
/// a clone never aliases the original. This is how the target network is
/// created at agent construction.
pub struct DqnModel<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    device: Device,
    var_store: nn::VarStore,

    // Dimension of the output vector (equal to the number of actions).
    pub(super) out_dim: i64,

    // Action-value function
    q: Q,

    // Optimizer
    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs the model on the given device.
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Self {
        let out_dim = config
            .q_config
            .as_ref()
            .expect("q_config is required for DqnModel")
            .get_out_dim();
        let opt_config = config.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let q = Q::build(&var_store, config.q_config.unwrap());

        Self::_build(device, out_dim, opt_config, q, var_store, None)
    }

    fn _build(
        device: Device,
        out_dim: i64,
        opt_config: OptimizerConfig,
        q: Q,
        mut var_store: nn::VarStore,
        var_store_src: Option<&nn::VarStore>,
    ) -> Self {
        let opt = opt_config.build(&var_store).unwrap();

        if let Some(var_store_src) = var_store_src {
            var_store.copy(var_store_src).unwrap();
        }

        Self {
            device,
            out_dim,
            opt_config,
            var_store,
            opt,
            q,
        }
    }

    /// Outputs the action values given an observation batch.
    pub fn forward(&self, x: &Q::Input) -> Tensor {
        let a = self.q.forward(x);
        debug_assert_eq!(a.size().as_slice()[1], self.out_dim);
        a
    }
}

impl<Q> Clone for DqnModel<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    fn clone(&self) -> Self {
        let device = self.device;
        let out_dim = self.out_dim;
        let opt_config = self.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let q = self.q.clone_with_var_store(&var_store);

        Self::_build(
            device,
            out_dim,
            opt_config,
            q,
            var_store,
            Some(&self.var_store),
        )
    }
}

impl<Q> ModelBase for DqnModel<Q>
where
    Q: SubModel<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
    }

    fn get_var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.var_store
    }

    fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save DQN model to {:?}", path.as_ref());
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load DQN model from {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DqnModel, DqnModelConfig};
    use crate::{
        cnn::{PixelCnn, PixelCnnConfig},
        model::ModelBase,
        opt::OptimizerConfig,
    };
    use std::convert::TryFrom;
    use tch::{Device, Kind, Tensor};
    use tempdir::TempDir;

    fn config() -> DqnModelConfig<PixelCnnConfig> {
        DqnModelConfig::default()
            .q_config(PixelCnnConfig {
                n_stack: 4,
                out_dim: 6,
            })
            .opt_config(OptimizerConfig::Adam { lr: 1e-4 })
    }

    fn fixed_input() -> Tensor {
        // deterministic non-trivial pixel pattern
        Tensor::arange(2 * 4 * 84 * 84, (Kind::Int64, Device::Cpu))
            .remainder(256)
            .to_kind(Kind::Uint8)
            .view([2, 4, 84, 84])
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let model = DqnModel::<PixelCnn>::build(config(), Device::Cpu);
        let cloned = model.clone();

        let x = fixed_input();
        let a = Vec::<f32>::try_from(&model.forward(&x).flatten(0, -1)).unwrap();
        let b = Vec::<f32>::try_from(&cloned.forward(&x).flatten(0, -1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parameters_round_trip_through_a_checkpoint() {
        let dir = TempDir::new("dqn_model").unwrap();
        let path = dir.path().join("qnet.pt");

        let model = DqnModel::<PixelCnn>::build(config(), Device::Cpu);
        model.save(&path).unwrap();

        let mut restored = DqnModel::<PixelCnn>::build(config(), Device::Cpu);
        restored.load(&path).unwrap();

        let x = fixed_input();
        let a = Vec::<f32>::try_from(&model.forward(&x).flatten(0, -1)).unwrap();
        let b = Vec::<f32>::try_from(&restored.forward(&x).flatten(0, -1)).unwrap();
        assert_eq!(a, b);
    }
}
