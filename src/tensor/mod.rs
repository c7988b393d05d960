/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量模块：计算图（Procedure）所消费的操作数。
 *                 只提供计算图需要的固定契约：元素读写、加减乘除、矩阵乘、转置、
 *                 以及逐元素地应用一元/二元函数；形状不匹配时返回`TensorError`。
 */

use ndarray::{Array, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod div;
    pub mod eq;
    pub mod mat_mul;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod function;
mod index;
mod print;
mod property;

pub use function::{BinaryFunction, BinaryFunctionType, UnaryFunction, UnaryFunctionType};

#[cfg(test)]
mod tests;

static NEXT_TENSOR_ID: AtomicU64 = AtomicU64::new(1);

/// 张量的身份标识。
/// 计算图按身份（而非数值）区分张量：同一个张量实例在一次构建中只对应一个节点。
/// 注：`clone()`得到的是新张量，其身份与原张量不同。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TensorId(u64);

impl TensorId {
    fn next() -> Self {
        Self(NEXT_TENSOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Serialize, Deserialize)]
pub struct Tensor {
    #[serde(skip, default = "TensorId::next")]
    id: TensorId,
    data: Array<f64, IxDyn>,
}

impl Clone for Tensor {
    /// 克隆出的张量拥有新的身份
    fn clone(&self) -> Self {
        Self::from_array(self.data.clone())
    }
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f64], shape: &[usize]) -> Self {
        Self::try_new(data, shape).unwrap_or_else(|e| panic!("{e}"))
    }

    /// `new`的不panic版本
    pub fn try_new(data: &[f64], shape: &[usize]) -> Result<Self, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self::from_array(data))
    }

    /// 创建一个所有元素都为0的张量
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_array(Array::zeros(IxDyn(shape)))
    }

    /// 创建一个所有元素都为1的张量
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.)
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn full(shape: &[usize], value: f64) -> Self {
        Self::from_array(Array::from_elem(IxDyn(shape), value))
    }

    /// 创建一个与本张量形状相同、元素全为0的新张量
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape())
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: f64, max: f64, shape: &[usize]) -> Self {
        Self::new_random_with_rng(min, max, shape, &mut rand::thread_rng())
    }

    /// 创建一个带固定种子的随机张量（确保可重复性）
    pub fn new_random_with_seed(min: f64, max: f64, shape: &[usize], seed: u64) -> Self {
        Self::new_random_with_rng(min, max, shape, &mut StdRng::seed_from_u64(seed))
    }

    pub fn new_random_with_rng<R: Rng>(min: f64, max: f64, shape: &[usize], rng: &mut R) -> Self {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 张量的身份
    pub const fn id(&self) -> TensorId {
        self.id
    }
}

// 私有方法
impl Tensor {
    pub(crate) fn from_array(data: Array<f64, IxDyn>) -> Self {
        Self {
            id: TensorId::next(),
            data,
        }
    }

    fn has_zero_value(&self) -> bool {
        self.data.iter().any(|&x| x == 0.)
    }
}
