use super::{gradient_of, value_of, ExpressionId, TraitExpression};
use crate::procedure::{GraphError, Node, NodeId};
use crate::tensor::BinaryFunction;

/// 二元函数：`result = f(arg1, arg2)`。
/// 反向时只对`arg1`求导：`d(arg1) += ∂f/∂arg1(arg1, arg2) ⊙ d(result)`，`arg2`（如目标值）不接收梯度
#[derive(Debug, Clone)]
pub struct BinaryFunctionExpression {
    id: ExpressionId,
    arg1: NodeId,
    arg2: NodeId,
    result: NodeId,
    function: BinaryFunction,
}

impl BinaryFunctionExpression {
    pub(crate) const fn new(
        id: ExpressionId,
        arg1: NodeId,
        arg2: NodeId,
        result: NodeId,
        function: BinaryFunction,
    ) -> Self {
        Self {
            id,
            arg1,
            arg2,
            result,
            function,
        }
    }

    pub const fn function(&self) -> &BinaryFunction {
        &self.function
    }
}

impl TraitExpression for BinaryFunctionExpression {
    fn id(&self) -> ExpressionId {
        self.id
    }

    fn name(&self) -> &'static str {
        "BINARY_FUNCTION"
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
        let value = self.function.try_apply_function(
            value_of(nodes, self.arg1, index)?,
            value_of(nodes, self.arg2, index)?,
        )?;
        nodes[self.result.0].set_value(index, value);
        Ok(())
    }

    fn calculate_gradient(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let gradient = gradient_of(nodes, self.result, index)?;
        let derivative = self.function.try_apply_derivative(
            value_of(nodes, self.arg1, index)?,
            value_of(nodes, self.arg2, index)?,
        )?;
        let arg1_gradient = derivative.try_mul(&gradient)?;
        nodes[self.arg1.0].add_gradient(index, &arg1_gradient)
    }

    fn expression_formula(&self) -> String {
        format!(
            "{}({}, {}) = {}",
            self.function.name(),
            self.arg1,
            self.arg2,
            self.result
        )
    }

    fn gradient_formula(&self) -> String {
        format!(
            "d({}) += {}'({}, {}) * d({})",
            self.arg1,
            self.function.name(),
            self.arg1,
            self.arg2,
            self.result
        )
    }
}
