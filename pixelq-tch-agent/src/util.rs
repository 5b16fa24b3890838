//! Utilities.
use crate::model::ModelBase;
use log::trace;

/// Applies a soft update on the variables of `dest` toward those of `src`.
///
/// Variables are identified by their names:
///
/// `dest = tau * src + (1.0 - tau) * dest`
///
/// With `tau = 1.0` this is a hard copy. Gradients never flow through this
/// operation; the destination network is updated only by blending.
pub fn track<M: ModelBase>(dest: &mut M, src: &mut M, tau: f64) {
    let src = &mut src.get_var_store().variables();
    let dest = &mut dest.get_var_store().variables();
    debug_assert_eq!(src.len(), dest.len());

    let names = src.keys();
    tch::no_grad(|| {
        for name in names {
            let src = src.get(name).unwrap();
            let dest = dest.get_mut(name).unwrap();
            dest.copy_(&(tau * src + (1.0 - tau) * &*dest));
        }
    });
    trace!("soft update");
}

/// Interface for configurations with an output dimension.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: i64);
}

#[cfg(test)]
mod tests {
    use super::track;
    use crate::model::ModelBase;
    use anyhow::Result;
    use std::convert::TryFrom;
    use std::path::Path;
    use tch::{nn, nn::VarStore, Device, Tensor};

    struct TestModel {
        vs: VarStore,
    }

    impl TestModel {
        fn with_value(value: f64) -> Self {
            let vs = VarStore::new(Device::Cpu);
            let _ = vs.root().var("w", &[4], nn::Init::Const(value));
            Self { vs }
        }

        fn w(&self) -> Vec<f32> {
            let t = self.vs.variables().get("w").unwrap().copy();
            Vec::<f32>::try_from(&t).unwrap()
        }
    }

    impl ModelBase for TestModel {
        fn backward_step(&mut self, _loss: &Tensor) {
            unimplemented!();
        }

        fn get_var_store_mut(&mut self) -> &mut VarStore {
            &mut self.vs
        }

        fn get_var_store(&self) -> &VarStore {
            &self.vs
        }

        fn save<T: AsRef<Path>>(&self, _path: T) -> Result<()> {
            unimplemented!();
        }

        fn load<T: AsRef<Path>>(&mut self, _path: T) -> Result<()> {
            unimplemented!();
        }
    }

    #[test]
    fn hard_copy_makes_parameters_identical_and_is_idempotent() {
        let mut src = TestModel::with_value(0.7);
        let mut dest = TestModel::with_value(-0.3);

        track(&mut dest, &mut src, 1.0);
        assert_eq!(dest.w(), src.w());

        track(&mut dest, &mut src, 1.0);
        assert_eq!(dest.w(), src.w());
    }

    #[test]
    fn soft_update_lands_strictly_between_the_parameter_sets() {
        let mut src = TestModel::with_value(1.0);
        let mut dest = TestModel::with_value(0.0);

        track(&mut dest, &mut src, 0.25);

        for v in dest.w() {
            assert!(v > 0.0 && v < 1.0);
            assert!((v - 0.25).abs() < 1e-6);
        }
    }
}
