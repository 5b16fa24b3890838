//! Training and evaluation of a DQN agent on a synthetic pixel environment.
pub mod env;
pub mod types;
