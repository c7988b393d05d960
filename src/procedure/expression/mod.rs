/*
 * @Author       : 老董
 * @Description  : 被记录的单个运算（表达式）。
 *                 每种运算一个结构体，经`enum_dispatch`汇总为`Expression`枚举；
 *                 前向（`calculate_expression`）与反向（`calculate_gradient`）规则都只作用于节点竞技场中的某个索引。
 */

mod add;
mod binary_function;
mod divide;
mod dot;
mod multiply;
mod subtract;
mod unary_function;

pub use add::AddExpression;
pub use binary_function::BinaryFunctionExpression;
pub use divide::DivideExpression;
pub use dot::DotExpression;
pub use multiply::MultiplyExpression;
pub use subtract::SubtractExpression;
pub use unary_function::UnaryFunctionExpression;

use super::{GraphError, Node, NodeId};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 表达式序号：在一次构建中从0开始、按创建顺序连续递增，同时也是前向求值顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpressionId(pub usize);

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 结构性二元运算的种类（不带函数的二元表达式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperation {
    Add,
    Subtract,
    Dot,
    Multiply,
    Divide,
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum Expression {
    UnaryFunction(UnaryFunctionExpression),
    BinaryFunction(BinaryFunctionExpression),
    Add(AddExpression),
    Subtract(SubtractExpression),
    Dot(DotExpression),
    Multiply(MultiplyExpression),
    Divide(DivideExpression),
}

impl Expression {
    /// 按结构性运算的种类创建表达式
    pub(crate) fn new_binary(
        operation: BinaryOperation,
        id: ExpressionId,
        arg1: NodeId,
        arg2: NodeId,
        result: NodeId,
    ) -> Self {
        match operation {
            BinaryOperation::Add => AddExpression::new(id, arg1, arg2, result).into(),
            BinaryOperation::Subtract => SubtractExpression::new(id, arg1, arg2, result).into(),
            BinaryOperation::Dot => DotExpression::new(id, arg1, arg2, result).into(),
            BinaryOperation::Multiply => MultiplyExpression::new(id, arg1, arg2, result).into(),
            BinaryOperation::Divide => DivideExpression::new(id, arg1, arg2, result).into(),
        }
    }
}

#[enum_dispatch(Expression)]
pub trait TraitExpression {
    fn id(&self) -> ExpressionId;

    /// 运算名，如`ADD`、`UNARY_FUNCTION`
    fn name(&self) -> &'static str;

    fn arg1(&self) -> NodeId;

    /// 一元表达式没有第二个参数
    fn arg2(&self) -> Option<NodeId>;

    fn result(&self) -> NodeId;

    /// 在`index`处求结果节点的值
    fn calculate_expression(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError>;

    /// 在`index`处把结果节点的梯度按本运算的规则累加到参数节点上
    fn calculate_gradient(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError>;

    /// 前向公式，如`n0 + n1 = n2`
    fn expression_formula(&self) -> String;

    /// 反向公式，如`d(n0) += d(n2), d(n1) += d(n2)`
    fn gradient_formula(&self) -> String;
}

// ========== 各表达式共用的节点访问 ==========

fn value_of(nodes: &[Node], node: NodeId, index: usize) -> Result<&Tensor, GraphError> {
    nodes[node.0]
        .value(index)
        .ok_or(GraphError::MissingValue { node, index })
}

fn gradient_of(nodes: &[Node], node: NodeId, index: usize) -> Result<Tensor, GraphError> {
    nodes[node.0]
        .gradient(index)
        .cloned()
        .ok_or(GraphError::MissingGradient { node, index })
}
