//! Tensor-backed column storage for replay buffers.
use pixelq_core::replay_buffer::BatchBase;
use tch::Tensor;

/// A column of batched data backed by a [`Tensor`].
///
/// The internal buffer has the shape `[capacity, shape[1..]]`, where `shape`
/// is taken from the first pushed data; the first axis of pushed data is the
/// batch axis. The dtype follows the pushed data, so `u8` pixel observations
/// stay `u8` in storage and are only cast inside the estimator.
pub struct TensorBatch {
    buf: Option<Tensor>,
    capacity: i64,
}

impl TensorBatch {
    /// Wraps a tensor whose first axis is the batch axis.
    pub fn from_tensor(t: Tensor) -> Self {
        let capacity = t.size()[0];
        Self {
            buf: Some(t),
            capacity,
        }
    }
}

impl Clone for TensorBatch {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.as_ref().map(|t| t.copy()),
            capacity: self.capacity,
        }
    }
}

impl BatchBase for TensorBatch {
    fn new(capacity: usize) -> Self {
        Self {
            buf: None,
            capacity: capacity as _,
        }
    }

    /// Pushes the given data at `index`, wrapping around at the capacity.
    ///
    /// The internal buffer is initialized lazily from the shape and dtype of
    /// the first pushed data.
    fn push(&mut self, index: usize, data: Self) {
        let data = match data.buf {
            Some(data) => data,
            None => return,
        };
        let batch_size = data.size()[0];
        if batch_size == 0 {
            return;
        }

        if self.buf.is_none() {
            let mut shape = data.size();
            shape[0] = self.capacity;
            self.buf = Some(Tensor::zeros(&shape, (data.kind(), tch::Device::Cpu)));
        }

        let buf = self.buf.as_ref().unwrap();
        let index = index as i64;
        for i_ in 0..batch_size {
            let i = (i_ + index) % self.capacity;
            buf.get(i).copy_(&data.get(i_));
        }
    }

    fn sample(&self, ixs: &Vec<usize>) -> Self {
        let ixs = ixs.iter().map(|&ix| ix as i64).collect::<Vec<_>>();
        let batch_indexes = Tensor::from_slice(&ixs);
        let buf = self
            .buf
            .as_ref()
            .expect("cannot sample from an empty column")
            .index_select(0, &batch_indexes);
        Self {
            buf: Some(buf),
            capacity: ixs.len() as i64,
        }
    }
}

impl From<TensorBatch> for Tensor {
    fn from(b: TensorBatch) -> Self {
        b.buf.expect("the column holds no data")
    }
}
