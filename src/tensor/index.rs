use super::Tensor;
use crate::errors::TensorError;

// 元素级读写
impl Tensor {
    /// 读取`indices`处的单个元素
    pub fn get(&self, indices: &[usize]) -> Result<f64, TensorError> {
        self.data
            .get(indices)
            .copied()
            .ok_or_else(|| self.out_of_bounds(indices))
    }

    /// 原地改写`indices`处的单个元素（张量身份不变）
    pub fn set(&mut self, indices: &[usize], value: f64) -> Result<(), TensorError> {
        let error = self.out_of_bounds(indices);
        let element = self.data.get_mut(indices).ok_or(error)?;
        *element = value;
        Ok(())
    }

    fn out_of_bounds(&self, indices: &[usize]) -> TensorError {
        TensorError::IndexOutOfBounds {
            index: indices.to_vec(),
            shape: self.shape().to_vec(),
        }
    }
}
