/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的逐元素除法，规则同加法；除数中含0元素时报错
 */

use super::others::elementwise;
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::Div;

impl Tensor {
    pub fn try_div(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        if other.has_zero_value() {
            return Err(TensorError::DivByZeroElement);
        }
        elementwise(self, other, Operator::Div, |a, b| a / b)
    }
}

impl Div<f64> for &Tensor {
    type Output = Tensor;

    fn div(self, scalar: f64) -> Tensor {
        self.map(|x| x / scalar)
    }
}

impl Div for Tensor {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        div_within_tensors(&self, &other)
    }
}

impl<'b> Div<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn div(self, other: &'b Tensor) -> Tensor {
        div_within_tensors(self, other)
    }
}

fn div_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    tensor_1
        .try_div(tensor_2)
        .unwrap_or_else(|e| panic!("{e}"))
}
