//! Conversions between Burn tensors and flat host buffers.

use burn::prelude::*;
use burn::tensor::Element;

use crate::error::{NeuralIsoError, Result};

/// Read a float tensor into a flat C-order buffer of `E`.
pub fn tensor_to_vec<B: Backend, const D: usize, E: Element>(tensor: Tensor<B, D>) -> Result<Vec<E>> {
    tensor
        .into_data()
        .convert::<E>()
        .to_vec::<E>()
        .map_err(|err| NeuralIsoError::InvalidData(format!("{:?}", err)))
}

/// Read a `[n, 3]` float tensor into rows.
pub fn tensor_to_rows<B: Backend, E: Element + Copy>(tensor: Tensor<B, 2>) -> Result<Vec<[E; 3]>> {
    let [_, cols] = tensor.dims();
    if cols != 3 {
        return Err(NeuralIsoError::ShapeMismatch {
            expected: vec![tensor.dims()[0], 3],
            got: tensor.dims().to_vec(),
        });
    }
    let flat = tensor_to_vec::<B, 2, E>(tensor)?;
    Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// Build a `[n, 3]` float tensor from rows.
pub fn rows_to_tensor<B: Backend, E: Element + Copy>(rows: &[[E; 3]], device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<E> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Tensor::from_data(TensorData::new(flat, [rows.len(), 3]), device)
}

/// Build a `[f, K]` integer tensor of face indices.
pub fn faces_to_tensor<B: Backend, const K: usize>(faces: &[[u32; K]], device: &B::Device) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = faces.iter().flat_map(|f| f.iter().map(|&i| i as i64)).collect();
    Tensor::from_data(TensorData::new(flat, [faces.len(), K]), device)
}

/// Build a float tensor of the given shape from a flat buffer.
pub fn vec_to_tensor<B: Backend, const D: usize, E: Element>(
    values: Vec<E>,
    shape: [usize; D],
    device: &B::Device,
) -> Tensor<B, D> {
    Tensor::from_data(TensorData::new(values, shape), device)
}
