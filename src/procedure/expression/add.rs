use super::{gradient_of, value_of, ExpressionId, TraitExpression};
use crate::procedure::{GraphError, Node, NodeId};

/// 加法：`result = arg1 + arg2`
#[derive(Debug, Clone)]
pub struct AddExpression {
    id: ExpressionId,
    arg1: NodeId,
    arg2: NodeId,
    result: NodeId,
}

impl AddExpression {
    pub(crate) const fn new(id: ExpressionId, arg1: NodeId, arg2: NodeId, result: NodeId) -> Self {
        Self {
            id,
            arg1,
            arg2,
            result,
        }
    }
}

impl TraitExpression for AddExpression {
    fn id(&self) -> ExpressionId {
        self.id
    }

    fn name(&self) -> &'static str {
        "ADD"
    }

    fn arg1(&self) -> NodeId {
        self.arg1
    }

    fn arg2(&self) -> Option<NodeId> {
        Some(self.arg2)
    }

    fn result(&self) -> NodeId {
        self.result
    }

    fn calculate_expression(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let value = value_of(nodes, self.arg1, index)?.try_add(value_of(nodes, self.arg2, index)?)?;
        nodes[self.result.0].set_value(index, value);
        Ok(())
    }

    fn calculate_gradient(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let gradient = gradient_of(nodes, self.result, index)?;
        nodes[self.arg1.0].add_gradient(index, &gradient)?;
        nodes[self.arg2.0].add_gradient(index, &gradient)
    }

    fn expression_formula(&self) -> String {
        format!("{} + {} = {}", self.arg1, self.arg2, self.result)
    }

    fn gradient_formula(&self) -> String {
        format!(
            "d({}) += d({}), d({}) += d({})",
            self.arg1, self.result, self.arg2, self.result
        )
    }
}
