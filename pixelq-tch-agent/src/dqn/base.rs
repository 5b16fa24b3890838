//! DQN agent implemented with tch-rs.
use super::{config::DqnConfig, explorer::EpsilonGreedy, model::DqnModel};
use crate::{
    model::{ModelBase, SubModel},
    util::{track, OutDim},
};
use anyhow::Result;
use pixelq_core::{
    error::PixelqError,
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Agent, Configurable, Env, Policy, ReplayBufferBase,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, marker::PhantomData, path::Path};
use tch::{no_grad, Device, Kind, Tensor};

/// Bootstrapped regression target `r + gamma * max_a Q_tgt(s') * (1 - done)`.
///
/// The `(1 - done)` factor zeroes the bootstrap term for terminal
/// transitions: their target is exactly the observed reward, independent of
/// the target network output for that row.
fn td_target(reward: &Tensor, q_next: &Tensor, is_done: &Tensor, gamma: f64) -> Tensor {
    let (q_max, _) = q_next.max_dim(-1, false);
    reward + gamma * q_max * (1.0 - is_done)
}

/// DQN agent implemented with tch-rs.
///
/// The agent owns two estimators of identical architecture: the online
/// network, the sole target of gradient updates, and the target network,
/// initialized as a deep copy of the online parameters and afterwards updated
/// only by Polyak averaging in [`Agent::sync`]. The two parameter sets are
/// never aliased.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    pub(in crate::dqn) qnet: DqnModel<Q>,
    pub(in crate::dqn) qnet_tgt: DqnModel<Q>,
    pub(in crate::dqn) batch_size: usize,
    pub(in crate::dqn) discount_factor: f64,
    pub(in crate::dqn) tau: f64,
    pub(in crate::dqn) train: bool,
    pub(in crate::dqn) explorer: EpsilonGreedy,
    pub(in crate::dqn) device: Device,
    pub(in crate::dqn) n_opts: usize,
    pub(in crate::dqn) phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, next_obs, reward, is_done) = batch.unpack();
        let obs: Q::Input = obs.into();
        let act: Tensor = act.into();
        let act = act.to(self.device);
        let next_obs: Q::Input = next_obs.into();
        let reward = Tensor::from_slice(&reward[..]).to(self.device);
        let is_done = Tensor::from_slice(&is_done[..])
            .to_kind(Kind::Float)
            .to(self.device);

        let pred = self.qnet.forward(&obs).gather(-1, &act, false).squeeze();

        let tgt = no_grad(|| {
            let q_next = self.qnet_tgt.forward(&next_obs);
            td_target(&reward, &q_next, &is_done, self.discount_factor)
        });

        let loss = pred.mse_loss(&tgt, tch::Reduction::Mean);
        let loss_value = f32::from(&loss);
        if !loss_value.is_finite() {
            return Err(PixelqError::NonFiniteLoss {
                step: self.n_opts,
                value: loss_value,
            }
            .into());
        }
        self.qnet.backward_step(&loss);

        Ok(loss_value)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    /// In training mode, applies epsilon-greedy action selection; in
    /// evaluation mode, the action is always the greedy one.
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        no_grad(|| {
            let q = self.qnet.forward(&obs.clone().into());
            let a = if self.train {
                self.explorer.action(&q)
            } else {
                q.argmax(-1, false)
            };
            a.into()
        })
    }
}

impl<E, Q, R> Configurable<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    type Config = DqnConfig<Q>;

    /// Constructs a DQN agent.
    ///
    /// The target network starts as an exact copy of the online network.
    fn build(config: Self::Config) -> Self {
        let device = config
            .device
            .expect("No device is given for the DQN agent")
            .into();
        let qnet = DqnModel::build(config.model_config, device);
        let qnet_tgt = qnet.clone();

        Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            tau: config.tau,
            train: config.train,
            explorer: config.explorer,
            device,
            n_opts: 0,
            phantom: PhantomData,
        }
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<Q::Input>,
    E::Act: From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<Q::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;
        Ok(Record::from_slice(&[(
            "loss",
            RecordValue::Scalar(loss),
        )]))
    }

    fn sync(&mut self) {
        track(&mut self.qnet_tgt, &mut self.qnet, self.tau);
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("qnet.pt").as_path())?;
        self.qnet_tgt.save(path.join("qnet_tgt.pt").as_path())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.pt").as_path())?;
        self.qnet_tgt.load(path.join("qnet_tgt.pt").as_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::td_target;
    use std::convert::TryFrom;
    use tch::Tensor;

    #[test]
    fn terminal_transitions_bootstrap_to_the_reward_alone() {
        let reward = Tensor::from_slice(&[1.5f32, -2.0]);
        let q_next = Tensor::from_slice(&[100.0f32, 3.0, 7.0, -1.0]).view([2, 2]);
        let is_done = Tensor::from_slice(&[1.0f32, 1.0]);

        let tgt = td_target(&reward, &q_next, &is_done, 0.99);

        assert_eq!(Vec::<f32>::try_from(&tgt).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn non_terminal_transitions_bootstrap_from_the_best_next_value() {
        let reward = Tensor::from_slice(&[1.0f32]);
        let q_next = Tensor::from_slice(&[2.0f32, 4.0]).view([1, 2]);
        let is_done = Tensor::from_slice(&[0.0f32]);

        let tgt = td_target(&reward, &q_next, &is_done, 0.5);

        assert_eq!(Vec::<f32>::try_from(&tgt).unwrap(), vec![3.0]);
    }
}
