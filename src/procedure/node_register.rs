/*
 * @Author       : 老董
 * @Description  : 节点登记表：一次构建中张量身份到节点的绑定，以及节点竞技场本身
 */

use super::{ExpressionId, GraphError, Node, NodeId, Provenance};
use crate::tensor::{Tensor, TensorId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct NodeRegister {
    nodes: Vec<Node>,
    /// 构建期间与本次构建绑定的张量；编译完成后清空
    tensor_nodes: HashMap<TensorId, NodeId>,
}

impl NodeRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// 若张量已在本次构建中登记则返回其节点，否则新建一个
    pub fn define_node(
        &mut self,
        tensor: &Tensor,
        is_constant: bool,
        build_id: usize,
        provenance: Provenance,
    ) -> NodeId {
        if let Some(&node_id) = self.tensor_nodes.get(&tensor.id()) {
            return node_id;
        }
        let node_id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(node_id, tensor, is_constant, build_id, provenance));
        self.tensor_nodes.insert(tensor.id(), node_id);
        node_id
    }

    pub fn contains(&self, tensor: &Tensor) -> bool {
        self.tensor_nodes.contains_key(&tensor.id())
    }

    pub fn get_node(&self, tensor: &Tensor) -> Result<NodeId, GraphError> {
        self.tensor_nodes
            .get(&tensor.id())
            .copied()
            .ok_or(GraphError::NodeNotFound(tensor.id()))
    }

    /// 节点的来源表达式序号，仅用于比较前后两次构建
    pub fn get_expression_id(&self, node: NodeId) -> ExpressionId {
        self.nodes[node.0].provenance().expression_id()
    }

    pub fn provenance(&self, node: NodeId) -> Provenance {
        self.nodes[node.0].provenance()
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    pub(crate) fn node_id_of(&self, tensor_id: TensorId) -> Option<NodeId> {
        self.tensor_nodes.get(&tensor_id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 解除本次构建与所有张量的绑定，之后对这些张量的运算不会再被记录
    pub fn remove_procedure_factory(&mut self) {
        self.tensor_nodes.clear();
    }

    pub(crate) fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
