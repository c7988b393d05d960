/*
 * @Author       : 老董
 * @Description  : 可回放的计算过程（Procedure）
 *
 * 各部分分散在子模块中：
 * - node.rs / node_register.rs: 按索引存储值与梯度的节点，以及张量到节点的登记
 * - expression/: 单个被记录的运算（前向规则 + 反向规则）
 * - node_link.rs: 跨构建的节点关联（循环状态在索引间的传递）
 * - factory/: 记录运算、编译过程、分析两次构建间的依赖
 * - procedure.rs / sequence.rs: 编译后的过程及其按索引（序列）回放
 * - descriptor.rs / display.rs: 描述符与可读输出
 */

mod descriptor;
mod display;
mod error;
mod expression;
mod factory;
mod node;
mod node_link;
mod node_register;
#[allow(clippy::module_inception)]
mod procedure;
mod sequence;

pub use descriptor::{
    ExpressionDescriptor, ExpressionKindDescriptor, LinkDescriptor, NodeDescriptor,
    ProcedureDescriptor,
};
pub use error::GraphError;
pub use expression::{
    AddExpression, BinaryFunctionExpression, BinaryOperation, DivideExpression, DotExpression,
    Expression, ExpressionId, MultiplyExpression, SubtractExpression, TraitExpression,
    UnaryFunctionExpression,
};
pub use factory::ProcedureFactory;
pub use node::{Node, NodeId, Provenance};
pub use node_link::NodeLink;
pub use node_register::NodeRegister;
pub use procedure::Procedure;
pub use sequence::Sequence;

#[cfg(test)]
mod tests;
