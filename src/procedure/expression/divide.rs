use super::{gradient_of, value_of, ExpressionId, TraitExpression};
use crate::procedure::{GraphError, Node, NodeId};

/// 逐元素除法：`result = arg1 ⊘ arg2`
#[derive(Debug, Clone)]
pub struct DivideExpression {
    id: ExpressionId,
    arg1: NodeId,
    arg2: NodeId,
    result: NodeId,
}

impl DivideExpression {
    pub(crate) const fn new(id: ExpressionId, arg1: NodeId, arg2: NodeId, result: NodeId) -> Self {
        Self {
            id,
            arg1,
            arg2,
            result,
        }
    }
}

impl TraitExpression for DivideExpression {
    fn id(&self) -> ExpressionId {
        self.id
    }

    fn name(&self) -> &'static str {
        "DIVIDE"
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
        let value = value_of(nodes, self.arg1, index)?.try_div(value_of(nodes, self.arg2, index)?)?;
        nodes[self.result.0].set_value(index, value);
        Ok(())
    }

    fn calculate_gradient(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let gradient = gradient_of(nodes, self.result, index)?;
        let arg1 = value_of(nodes, self.arg1, index)?;
        let arg2 = value_of(nodes, self.arg2, index)?;
        // d(arg1) = grad ⊘ arg2，d(arg2) = -grad ⊙ arg1 ⊘ arg2²
        let arg1_gradient = gradient.try_div(arg2)?;
        let arg2_gradient = gradient
            .try_mul(arg1)?
            .try_div(&arg2.try_mul(arg2)?)?;
        nodes[self.arg1.0].add_gradient(index, &arg1_gradient)?;
        nodes[self.arg2.0].subtract_gradient(index, &arg2_gradient)
    }

    fn expression_formula(&self) -> String {
        format!("{} / {} = {}", self.arg1, self.arg2, self.result)
    }

    fn gradient_formula(&self) -> String {
        format!(
            "d({}) += d({}) / {}, d({}) -= d({}) * {} / {}^2",
            self.arg1, self.result, self.arg2, self.arg2, self.result, self.arg1, self.arg2
        )
    }
}
