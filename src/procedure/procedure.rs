/*
 * @Author       : 老董
 * @Description  : 编译好的过程：可在任意多个索引上回放的前向 + 反向执行计划。
 *                 编译后表达式与关联都不再变化，只有节点中按索引存放的值与梯度会被读写。
 */

use super::{Expression, GraphError, Node, NodeId, NodeLink, TraitExpression};
use crate::tensor::{Tensor, TensorId};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Procedure {
    pub(super) name: String,
    pub(super) forward: Vec<Expression>,
    pub(super) backward: Vec<Expression>,
    pub(super) input: NodeId,
    pub(super) output: NodeId,
    pub(super) links: Vec<NodeLink>,
    pub(super) nodes: Vec<Node>,
    /// 调用方登记过的张量 -> 节点
    pub(super) registered: HashMap<TensorId, NodeId>,
}

impl Procedure {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        name: &str,
        forward: Vec<Expression>,
        backward: Vec<Expression>,
        input: NodeId,
        output: NodeId,
        links: Vec<NodeLink>,
        nodes: Vec<Node>,
        registered: HashMap<TensorId, NodeId>,
    ) -> Self {
        Self {
            name: name.to_string(),
            forward,
            backward,
            input,
            output,
            links,
            nodes,
            registered,
        }
    }

    // ========== 求值 ==========

    /// 在`index`处前向求值：先经各关联承接前一索引的状态，再绑定输入，最后按序号依次求各表达式。
    /// 返回输出节点
    pub fn calculate_expression(&mut self, index: usize, input: &Tensor) -> Result<NodeId, GraphError> {
        trace!("[{}] 索引{index}：前向求值", self.name);
        for link in &mut self.links {
            link.update_expression(&mut self.nodes, index);
        }
        self.nodes[self.input.0].set_value(index, input.clone());
        for expression in &self.forward {
            expression.calculate_expression(&mut self.nodes, index)?;
        }
        Ok(self.output)
    }

    /// 在`index`处反向求值：先写入输出梯度，再经各关联取回后一索引的梯度，最后按反向顺序依次执行各表达式的反向规则。
    /// 返回输入节点
    pub fn calculate_gradient(
        &mut self,
        index: usize,
        output_gradient: &Tensor,
    ) -> Result<NodeId, GraphError> {
        trace!("[{}] 索引{index}：反向求梯度", self.name);
        self.nodes[self.output.0].set_gradient(index, output_gradient.clone());
        for link in &mut self.links {
            link.update_gradient(&mut self.nodes, index)?;
        }
        for expression in &self.backward {
            expression.calculate_gradient(&mut self.nodes, index)?;
        }
        Ok(self.input)
    }

    // ========== 重置 ==========

    /// 清空所有节点在所有索引上的值与梯度，并清除各关联缓存的读数
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        for link in &mut self.links {
            link.reset();
        }
    }

    /// 只清空`index`处的值与梯度
    pub fn reset_index(&mut self, index: usize) {
        for node in &mut self.nodes {
            node.reset_index(index);
        }
    }

    /// 是否存在跨构建的关联（即是否为循环结构）
    pub fn has_dependencies(&self) -> bool {
        !self.links.is_empty()
    }

    /// 切断各关联的连续性（如在序列边界处），关联本身保留
    pub fn reset_dependencies(&mut self) {
        for link in &mut self.links {
            link.reset();
        }
    }

    // ========== 查询 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按张量查找节点，仅限调用方登记过的常量以及声明的输入、输出
    pub fn get_node(&self, tensor: &Tensor) -> Result<NodeId, GraphError> {
        self.registered
            .get(&tensor.id())
            .copied()
            .ok_or(GraphError::NodeNotFound(tensor.id()))
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub const fn input_node(&self) -> NodeId {
        self.input
    }

    pub const fn output_node(&self) -> NodeId {
        self.output
    }

    pub fn output_value(&self, index: usize) -> Result<&Tensor, GraphError> {
        self.nodes[self.output.0]
            .value(index)
            .ok_or(GraphError::MissingValue {
                node: self.output,
                index,
            })
    }

    pub fn input_gradient(&self, index: usize) -> Result<&Tensor, GraphError> {
        self.nodes[self.input.0]
            .gradient(index)
            .ok_or(GraphError::MissingGradient {
                node: self.input,
                index,
            })
    }

    pub fn forward_expressions(&self) -> &[Expression] {
        &self.forward
    }

    pub fn backward_expressions(&self) -> &[Expression] {
        &self.backward
    }

    pub fn links(&self) -> &[NodeLink] {
        &self.links
    }

    // ========== 常量（权重） ==========

    /// 登记张量在各索引上梯度的平均值；尚无梯度时为全0
    pub fn gradient_mean(&self, tensor: &Tensor) -> Result<Tensor, GraphError> {
        let node = self.node(self.get_node(tensor)?);
        Ok(node.gradient_mean()?.unwrap_or_else(|| node.empty_tensor()))
    }

    /// 调用方更新权重后，用其当前值刷新对应常量节点的共享值
    pub fn update_constant(&mut self, tensor: &Tensor) -> Result<(), GraphError> {
        let node = self.get_node(tensor)?;
        self.nodes[node.0].set_constant_value(tensor)
    }

    /// 阻断（或恢复）登记张量的梯度
    pub fn set_stop_gradient(&mut self, tensor: &Tensor, stop_gradient: bool) -> Result<(), GraphError> {
        let node = self.get_node(tensor)?;
        self.nodes[node.0].set_stop_gradient(stop_gradient);
        Ok(())
    }
}
