/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的减法（逐元素），规则同加法；另含取负运算
 */

use super::others::elementwise;
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::{Neg, Sub};

impl Tensor {
    pub fn try_sub(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        elementwise(self, other, Operator::Sub, |a, b| a - b)
    }

    /// 原地累减（张量身份不变）。`other`须与本张量形状一致或为标量
    pub fn try_sub_assign(&mut self, other: &Tensor) -> Result<(), TensorError> {
        if self.is_same_shape(other) {
            self.data -= &other.data;
        } else if let Some(number) = other.number() {
            self.data -= number;
        } else {
            return Err(TensorError::OperatorError {
                operator: Operator::SubAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            });
        }
        Ok(())
    }
}

impl Sub<f64> for &Tensor {
    type Output = Tensor;

    fn sub(self, scalar: f64) -> Tensor {
        self.map(|x| x - scalar)
    }
}

impl Sub for Tensor {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        sub_within_tensors(&self, &other)
    }
}

impl<'b> Sub<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn sub(self, other: &'b Tensor) -> Tensor {
        sub_within_tensors(self, other)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self.map(|x| -x)
    }
}

fn sub_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    tensor_1
        .try_sub(tensor_2)
        .unwrap_or_else(|e| panic!("{e}"))
}
