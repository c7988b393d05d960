use super::{gradient_of, value_of, ExpressionId, TraitExpression};
use crate::procedure::{GraphError, Node, NodeId};
use crate::tensor::UnaryFunction;

/// 一元函数：`result = f(arg1)`，反向时`d(arg1) += f'(arg1) ⊙ d(result)`
#[derive(Debug, Clone)]
pub struct UnaryFunctionExpression {
    id: ExpressionId,
    arg1: NodeId,
    result: NodeId,
    function: UnaryFunction,
}

impl UnaryFunctionExpression {
    pub(crate) const fn new(
        id: ExpressionId,
        arg1: NodeId,
        result: NodeId,
        function: UnaryFunction,
    ) -> Self {
        Self {
            id,
            arg1,
            result,
            function,
        }
    }

    pub const fn function(&self) -> &UnaryFunction {
        &self.function
    }
}

impl TraitExpression for UnaryFunctionExpression {
    fn id(&self) -> ExpressionId {
        self.id
    }

    fn name(&self) -> &'static str {
        "UNARY_FUNCTION"
    }

    fn arg1(&self) -> NodeId {
        self.arg1
    }

    fn arg2(&self) -> Option<NodeId> {
        None
    }

    fn result(&self) -> NodeId {
        self.result
    }

    fn calculate_expression(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let value = self
            .function
            .apply_function(value_of(nodes, self.arg1, index)?);
        nodes[self.result.0].set_value(index, value);
        Ok(())
    }

    fn calculate_gradient(&self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let gradient = gradient_of(nodes, self.result, index)?;
        let derivative = self
            .function
            .apply_derivative(value_of(nodes, self.arg1, index)?);
        let arg1_gradient = derivative.try_mul(&gradient)?;
        nodes[self.arg1.0].add_gradient(index, &arg1_gradient)
    }

    fn expression_formula(&self) -> String {
        format!("{}({}) = {}", self.function.name(), self.arg1, self.result)
    }

    fn gradient_formula(&self) -> String {
        format!(
            "d({}) += {}'({}) * d({})",
            self.arg1,
            self.function.name(),
            self.arg1,
            self.result
        )
    }
}
