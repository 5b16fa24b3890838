//! Interfaces of neural networks.
use anyhow::Result;
use std::path::Path;
use tch::{nn::VarStore, Tensor};

/// Base interface of a trainable network.
pub trait ModelBase {
    /// Trains the network given a loss.
    fn backward_step(&mut self, loss: &Tensor);

    /// Returns the variable store as a mutable reference.
    fn get_var_store_mut(&mut self) -> &mut VarStore;

    /// Returns the variable store.
    fn get_var_store(&self) -> &VarStore;

    /// Saves the parameters of the network.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Loads the parameters of the network.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}

/// A network that can be initialized with a [`VarStore`] and a configuration.
///
/// Structs implementing this trait can also be cloned onto a different
/// [`VarStore`], which is how the independently owned target network of a
/// value-based agent is created: same architecture, separate parameters.
pub trait SubModel {
    /// Configuration from which the [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds the [`SubModel`] with the given [`VarStore`] and configuration.
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// Clones the [`SubModel`] onto the given [`VarStore`].
    fn clone_with_var_store(&self, var_store: &VarStore) -> Self;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}
