/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的逐元素乘法（Hadamard积），规则同加法。
 *                 注意：这里的乘法不是矩阵乘法，矩阵乘法见`mat_mul`。
 */

use super::others::elementwise;
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::Mul;

impl Tensor {
    pub fn try_mul(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        elementwise(self, other, Operator::Mul, |a, b| a * b)
    }
}

impl Mul<f64> for &Tensor {
    type Output = Tensor;

    fn mul(self, scalar: f64) -> Tensor {
        self.map(|x| x * scalar)
    }
}

impl Mul for Tensor {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        mul_within_tensors(&self, &other)
    }
}

impl<'b> Mul<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: &'b Tensor) -> Tensor {
        mul_within_tensors(self, other)
    }
}

fn mul_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    tensor_1
        .try_mul(tensor_2)
        .unwrap_or_else(|e| panic!("{e}"))
}
