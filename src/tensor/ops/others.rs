/*
 * @Author       : 老董
 * @Description  : 张量的杂项运算：求和、逐元素映射，以及各二元逐元素运算共用的形状检查
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Zip;

impl Tensor {
    /// 所有元素之和
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// 所有元素的平均值
    pub fn mean(&self) -> f64 {
        self.data.mean().unwrap_or(0.)
    }

    /// 逐元素应用`f`，返回新张量
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Tensor {
        Tensor::from_array(self.data.mapv(f))
    }

    /// 逐元素求整数次幂
    pub fn powi(&self, n: i32) -> Tensor {
        self.map(|x| x.powi(n))
    }

    /// 与`other`逐元素地组合（`f(self_i, other_i)`）
    pub fn try_zip_with<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Tensor,
        f: F,
    ) -> Result<Tensor, TensorError> {
        elementwise(self, other, Operator::ApplyBinary, f)
    }
}

/// 两个张量逐元素运算：
/// 1. 形状严格一致：逐元素计算；
/// 2. 其中一个为标量（只含1个元素）：标量与另一个张量的每个元素计算，结果形状与后者相同；
/// 3. 其余情况返回`TensorError::OperatorError`。
pub(crate) fn elementwise<F: Fn(f64, f64) -> f64>(
    tensor_1: &Tensor,
    tensor_2: &Tensor,
    operator: Operator,
    f: F,
) -> Result<Tensor, TensorError> {
    if tensor_1.is_same_shape(tensor_2) {
        let data = Zip::from(&tensor_1.data)
            .and(&tensor_2.data)
            .map_collect(|&a, &b| f(a, b));
        return Ok(Tensor::from_array(data));
    }
    if let Some(number) = tensor_2.number() {
        return Ok(tensor_1.map(|a| f(a, number)));
    }
    if let Some(number) = tensor_1.number() {
        return Ok(tensor_2.map(|b| f(number, b)));
    }
    Err(TensorError::OperatorError {
        operator,
        tensor1_shape: tensor_1.shape().to_vec(),
        tensor2_shape: tensor_2.shape().to_vec(),
    })
}
