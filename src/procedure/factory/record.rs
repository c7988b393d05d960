/*
 * @Author       : 老董
 * @Description  : 运算辅助方法：即时算出结果张量；若任一参数与正在进行的构建绑定，则同时记录对应表达式。
 *                 空闲时或参数均未绑定时只计算、不记录。
 */

use super::ProcedureFactory;
use crate::procedure::{BinaryOperation, GraphError};
use crate::tensor::{BinaryFunction, Tensor, UnaryFunction};

impl ProcedureFactory {
    pub fn add(&mut self, arg1: &Tensor, arg2: &Tensor) -> Result<Tensor, GraphError> {
        let result = arg1.try_add(arg2)?;
        self.record_binary(arg1, arg2, &result, BinaryOperation::Add)?;
        Ok(result)
    }

    pub fn subtract(&mut self, arg1: &Tensor, arg2: &Tensor) -> Result<Tensor, GraphError> {
        let result = arg1.try_sub(arg2)?;
        self.record_binary(arg1, arg2, &result, BinaryOperation::Subtract)?;
        Ok(result)
    }

    /// 矩阵乘法
    pub fn dot(&mut self, arg1: &Tensor, arg2: &Tensor) -> Result<Tensor, GraphError> {
        let result = arg1.try_mat_mul(arg2)?;
        self.record_binary(arg1, arg2, &result, BinaryOperation::Dot)?;
        Ok(result)
    }

    /// 逐元素乘法
    pub fn multiply(&mut self, arg1: &Tensor, arg2: &Tensor) -> Result<Tensor, GraphError> {
        let result = arg1.try_mul(arg2)?;
        self.record_binary(arg1, arg2, &result, BinaryOperation::Multiply)?;
        Ok(result)
    }

    /// 逐元素除法
    pub fn divide(&mut self, arg1: &Tensor, arg2: &Tensor) -> Result<Tensor, GraphError> {
        let result = arg1.try_div(arg2)?;
        self.record_binary(arg1, arg2, &result, BinaryOperation::Divide)?;
        Ok(result)
    }

    pub fn apply_unary(
        &mut self,
        arg1: &Tensor,
        function: UnaryFunction,
    ) -> Result<Tensor, GraphError> {
        let result = function.apply_function(arg1);
        if self.is_attached(arg1) {
            self.add_unary_function_expression(arg1, &result, function)?;
        }
        Ok(result)
    }

    pub fn apply_binary(
        &mut self,
        arg1: &Tensor,
        arg2: &Tensor,
        function: BinaryFunction,
    ) -> Result<Tensor, GraphError> {
        let result = function.try_apply_function(arg1, arg2)?;
        if self.is_attached(arg1) || self.is_attached(arg2) {
            self.add_binary_function_expression(arg1, arg2, &result, function)?;
        }
        Ok(result)
    }

    fn record_binary(
        &mut self,
        arg1: &Tensor,
        arg2: &Tensor,
        result: &Tensor,
        operation: BinaryOperation,
    ) -> Result<(), GraphError> {
        if self.is_attached(arg1) || self.is_attached(arg2) {
            self.add_binary_expression(arg1, arg2, result, operation)?;
        }
        Ok(())
    }
}
