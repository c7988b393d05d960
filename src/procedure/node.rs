/*
 * @Author       : 老董
 * @Description  : 计算过程中的节点：每个索引（如时间步）各存一份值与梯度
 */

use super::{ExpressionId, GraphError};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 节点在所属过程（节点竞技场）中的下标，仅在一次构建的生命周期内有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// 节点的来源，用于比较前后两次构建
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// 叶子节点（声明的输入或常量），记录首次出现时的表达式序号
    Leaf(ExpressionId),
    /// 本次构建中某个表达式的结果
    Result(ExpressionId),
    /// 上一次构建中某个表达式的结果，在本次构建中作为参数出现（循环状态）
    Carried(ExpressionId),
}

impl Provenance {
    pub const fn expression_id(&self) -> ExpressionId {
        match *self {
            Self::Leaf(id) | Self::Result(id) | Self::Carried(id) => id,
        }
    }

    pub const fn is_carried(&self) -> bool {
        matches!(self, Self::Carried(_))
    }
}

/// 节点。
/// 常量节点只持有一份共享值，对所有索引都有效，按索引写入值的操作会被忽略；
/// 但其梯度仍按索引累加（见`gradient_sum`/`gradient_mean`）。
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    /// 构建时所见的张量副本：形状模板，常量节点的共享值
    reference: Tensor,
    constant: bool,
    build_id: usize,
    provenance: Provenance,
    stop_gradient: bool,
    values: BTreeMap<usize, Tensor>,
    gradients: BTreeMap<usize, Tensor>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        reference: &Tensor,
        constant: bool,
        build_id: usize,
        provenance: Provenance,
    ) -> Self {
        Self {
            id,
            reference: reference.clone(),
            constant,
            build_id,
            provenance,
            stop_gradient: false,
            values: BTreeMap::new(),
            gradients: BTreeMap::new(),
        }
    }

    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// 创建该节点时所处的构建序号（承接值沿用其产生时的构建序号）
    pub const fn build_id(&self) -> usize {
        self.build_id
    }

    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub const fn reference(&self) -> &Tensor {
        &self.reference
    }

    pub fn shape(&self) -> &[usize] {
        self.reference.shape()
    }

    /// 与节点形状相同的全0张量
    pub fn empty_tensor(&self) -> Tensor {
        self.reference.zeros_like()
    }

    pub const fn is_stop_gradient(&self) -> bool {
        self.stop_gradient
    }

    /// 阻断梯度后，该节点不再累加任何梯度
    pub fn set_stop_gradient(&mut self, stop_gradient: bool) {
        self.stop_gradient = stop_gradient;
    }

    // ========== 值 ==========

    pub fn value(&self, index: usize) -> Option<&Tensor> {
        if self.constant {
            Some(&self.reference)
        } else {
            self.values.get(&index)
        }
    }

    pub fn set_value(&mut self, index: usize, value: Tensor) {
        if self.constant {
            return;
        }
        self.values.insert(index, value);
    }

    /// 更新常量节点的共享值，形状须与原值一致
    pub(crate) fn set_constant_value(&mut self, value: &Tensor) -> Result<(), GraphError> {
        if !self.constant {
            return Err(GraphError::InvalidOperation(format!(
                "节点{}不是常量节点，无法更新其共享值",
                self.id
            )));
        }
        if !self.reference.is_same_shape(value) {
            return Err(GraphError::InvalidOperation(format!(
                "节点{}的形状为{:?}，与新值的形状{:?}不一致",
                self.id,
                self.reference.shape(),
                value.shape()
            )));
        }
        self.reference = value.clone();
        Ok(())
    }

    /// 已存有值的索引（常量节点恒为空）
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.keys().copied()
    }

    // ========== 梯度 ==========

    pub fn gradient(&self, index: usize) -> Option<&Tensor> {
        self.gradients.get(&index)
    }

    pub fn set_gradient(&mut self, index: usize, gradient: Tensor) {
        self.gradients.insert(index, gradient);
    }

    pub fn add_gradient(&mut self, index: usize, gradient: &Tensor) -> Result<(), GraphError> {
        self.cumulate_gradient(index, gradient, false)
    }

    pub fn subtract_gradient(&mut self, index: usize, gradient: &Tensor) -> Result<(), GraphError> {
        self.cumulate_gradient(index, gradient, true)
    }

    fn cumulate_gradient(
        &mut self,
        index: usize,
        gradient: &Tensor,
        negate: bool,
    ) -> Result<(), GraphError> {
        if self.stop_gradient {
            return Ok(());
        }
        // 标量节点（如被广播的偏置）须先把传入的梯度求和
        let summed;
        let gradient = if self.reference.is_scalar() && !gradient.is_scalar() {
            summed = Tensor::full(self.reference.shape(), gradient.sum());
            &summed
        } else {
            gradient
        };
        match self.gradients.get_mut(&index) {
            Some(existing) if negate => existing.try_sub_assign(gradient)?,
            Some(existing) => existing.try_add_assign(gradient)?,
            None => {
                let initial = if negate { -gradient } else { gradient.clone() };
                self.gradients.insert(index, initial);
            }
        }
        Ok(())
    }

    /// 所有索引上梯度之和；没有任何梯度时返回`Ok(None)`，各索引梯度形状不一致时报错
    pub fn gradient_sum(&self) -> Result<Option<Tensor>, GraphError> {
        let mut gradients = self.gradients.values();
        let Some(first) = gradients.next() else {
            return Ok(None);
        };
        let mut sum = first.clone();
        for gradient in gradients {
            sum.try_add_assign(gradient)?;
        }
        Ok(Some(sum))
    }

    /// 所有索引上梯度的平均值；没有任何梯度时返回`Ok(None)`
    pub fn gradient_mean(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self
            .gradient_sum()?
            .map(|sum| &sum / self.gradients.len() as f64))
    }

    // ========== 重置 ==========

    /// 清空所有索引上的值与梯度（常量节点的共享值保留）
    pub fn reset(&mut self) {
        self.values.clear();
        self.gradients.clear();
    }

    pub fn reset_index(&mut self, index: usize) {
        self.values.remove(&index);
        self.gradients.remove(&index);
    }
}
