/*
 * @Author       : 老董
 * @Description  : 计算过程（Procedure）的错误类型
 */

use super::NodeId;
use crate::errors::TensorError;
use crate::tensor::TensorId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    // ========== 构建期错误 ==========
    #[error("输出张量未在本次构建中注册为节点")]
    OutputNotRegistered,
    #[error("张量（id={}）没有对应的节点", .0.value())]
    NodeNotFound(TensorId),
    #[error("{0}")]
    InvalidOperation(String),

    // ========== 求值期错误 ==========
    #[error("节点{node}在索引{index}处没有值")]
    MissingValue { node: NodeId, index: usize },
    #[error("节点{node}在索引{index}处没有梯度")]
    MissingGradient { node: NodeId, index: usize },

    #[error(transparent)]
    Tensor(#[from] TensorError),
}
