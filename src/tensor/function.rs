/*
 * @Author       : 老董
 * @Description  : 可逐元素作用于张量的一元/二元函数（值 + 导数）。
 *                 二元函数的导数统一针对第一个参数求取，第二个参数视作常量（如损失函数中的目标值）。
 */

use super::Tensor;
use crate::errors::TensorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 内置一元函数的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFunctionType {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    Exp,
    Log,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Softplus,
    Square,
    Reciprocal,
}

impl fmt::Display for UnaryFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Linear => "LINEAR",
            Self::Sigmoid => "SIGMOID",
            Self::Tanh => "TANH",
            Self::Relu => "RELU",
            Self::Exp => "EXP",
            Self::Log => "LOG",
            Self::Sqrt => "SQRT",
            Self::Abs => "ABS",
            Self::Sin => "SIN",
            Self::Cos => "COS",
            Self::Softplus => "SOFTPLUS",
            Self::Square => "SQUARE",
            Self::Reciprocal => "RECIPROCAL",
        };
        write!(f, "{name}")
    }
}

/// 内置二元函数的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryFunctionType {
    MeanSquaredError,
    MeanAbsoluteError,
    CrossEntropy,
    Pow,
    Max,
    Min,
}

impl fmt::Display for BinaryFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::MeanSquaredError => "MEAN_SQUARED_ERROR",
            Self::MeanAbsoluteError => "MEAN_ABSOLUTE_ERROR",
            Self::CrossEntropy => "CROSS_ENTROPY",
            Self::Pow => "POW",
            Self::Max => "MAX",
            Self::Min => "MIN",
        };
        write!(f, "{name}")
    }
}

/// 一元函数：`function`为函数值，`derivative`为其导数（在自变量处求值）。
/// `function_type`为`None`表示自定义函数
#[derive(Debug, Clone, Copy)]
pub struct UnaryFunction {
    function_type: Option<UnaryFunctionType>,
    function: fn(f64) -> f64,
    derivative: fn(f64) -> f64,
}

impl UnaryFunction {
    pub fn new(function_type: UnaryFunctionType) -> Self {
        let (function, derivative): (fn(f64) -> f64, fn(f64) -> f64) = match function_type {
            UnaryFunctionType::Linear => (|x| x, |_| 1.),
            UnaryFunctionType::Sigmoid => (sigmoid, |x| sigmoid(x) * (1. - sigmoid(x))),
            UnaryFunctionType::Tanh => (f64::tanh, |x| 1. - x.tanh().powi(2)),
            UnaryFunctionType::Relu => (
                |x| if x < 0. { 0. } else { x },
                |x| if x < 0. { 0. } else { 1. },
            ),
            UnaryFunctionType::Exp => (f64::exp, f64::exp),
            UnaryFunctionType::Log => (f64::ln, |x| 1. / x),
            UnaryFunctionType::Sqrt => (f64::sqrt, |x| 1. / (2. * x.sqrt())),
            UnaryFunctionType::Abs => (f64::abs, f64::signum),
            UnaryFunctionType::Sin => (f64::sin, f64::cos),
            UnaryFunctionType::Cos => (f64::cos, |x| -x.sin()),
            UnaryFunctionType::Softplus => (|x| x.exp().ln_1p(), sigmoid),
            UnaryFunctionType::Square => (|x| x * x, |x| 2. * x),
            UnaryFunctionType::Reciprocal => (|x| 1. / x, |x| -1. / (x * x)),
        };
        Self {
            function_type: Some(function_type),
            function,
            derivative,
        }
    }

    /// 自定义一元函数
    pub fn custom(function: fn(f64) -> f64, derivative: fn(f64) -> f64) -> Self {
        Self {
            function_type: None,
            function,
            derivative,
        }
    }

    pub const fn function_type(&self) -> Option<UnaryFunctionType> {
        self.function_type
    }

    pub fn name(&self) -> String {
        self.function_type
            .map_or_else(|| "CUSTOM".to_string(), |t| t.to_string())
    }

    /// 逐元素计算函数值
    pub fn apply_function(&self, x: &Tensor) -> Tensor {
        x.map(self.function)
    }

    /// 逐元素计算导数值
    pub fn apply_derivative(&self, x: &Tensor) -> Tensor {
        x.map(self.derivative)
    }
}

/// 二元函数：`function(x, c)`为函数值，`derivative(x, c)`为对`x`的偏导。
/// `function_type`为`None`表示自定义函数
#[derive(Debug, Clone, Copy)]
pub struct BinaryFunction {
    function_type: Option<BinaryFunctionType>,
    function: fn(f64, f64) -> f64,
    derivative: fn(f64, f64) -> f64,
}

impl BinaryFunction {
    pub fn new(function_type: BinaryFunctionType) -> Self {
        let (function, derivative): (fn(f64, f64) -> f64, fn(f64, f64) -> f64) =
            match function_type {
                BinaryFunctionType::MeanSquaredError => {
                    (|x, c| 0.5 * (x - c).powi(2), |x, c| x - c)
                }
                BinaryFunctionType::MeanAbsoluteError => {
                    (|x, c| (x - c).abs(), |x, c| (x - c).signum())
                }
                BinaryFunctionType::CrossEntropy => (|x, c| -(c * x.ln()), |x, c| -(c / x)),
                BinaryFunctionType::Pow => (f64::powf, |x, c| c * x.powf(c - 1.)),
                BinaryFunctionType::Max => (f64::max, |x, c| if x >= c { 1. } else { 0. }),
                BinaryFunctionType::Min => (f64::min, |x, c| if x <= c { 1. } else { 0. }),
            };
        Self {
            function_type: Some(function_type),
            function,
            derivative,
        }
    }

    /// 自定义二元函数
    pub fn custom(function: fn(f64, f64) -> f64, derivative: fn(f64, f64) -> f64) -> Self {
        Self {
            function_type: None,
            function,
            derivative,
        }
    }

    pub const fn function_type(&self) -> Option<BinaryFunctionType> {
        self.function_type
    }

    pub fn name(&self) -> String {
        self.function_type
            .map_or_else(|| "CUSTOM".to_string(), |t| t.to_string())
    }

    /// 逐元素计算函数值`f(x, c)`
    pub fn try_apply_function(&self, x: &Tensor, c: &Tensor) -> Result<Tensor, TensorError> {
        x.try_zip_with(c, self.function)
    }

    /// 逐元素计算对`x`的偏导
    pub fn try_apply_derivative(&self, x: &Tensor, c: &Tensor) -> Result<Tensor, TensorError> {
        x.try_zip_with(c, self.derivative)
    }
}

fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}
