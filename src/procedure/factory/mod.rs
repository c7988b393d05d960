/*
 * @Author       : 老董
 * @Description  : 过程工厂（ProcedureFactory）：记录运算并把它们编译为可回放的过程
 *
 * 状态：空闲 -> 构建中（new_procedure） -> 空闲（end_procedure）。
 * 首次end_procedure只用于探测形状，返回None；之后每次都会与上一次构建比较，
 * 找出跨构建的依赖（NodeLink），并返回编译好的Procedure。
 *
 * - record.rs: 即时计算并按需记录的运算辅助方法（add、dot、apply_unary...）
 * - analysis.rs: 反向顺序推导、跨构建依赖分析
 */

mod analysis;
mod record;

use super::{
    BinaryFunctionExpression, BinaryOperation, Expression, ExpressionId, GraphError, NodeId,
    NodeRegister, Procedure, Provenance, TraitExpression, UnaryFunctionExpression,
};
use crate::tensor::{BinaryFunction, Tensor, TensorId, UnaryFunction};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 一次构建的工作状态
#[derive(Debug)]
struct ProcedureData {
    build_id: usize,
    register: NodeRegister,
    /// 前向表达式（按创建顺序）
    expressions: Vec<Expression>,
    /// 结果节点 -> 产生它的表达式（仅编译期使用）
    result_expressions: HashMap<NodeId, ExpressionId>,
    /// 结果张量 -> 产生它的表达式，供下一次构建识别承接值
    result_tensors: HashMap<TensorId, ExpressionId>,
    input_tensor: TensorId,
    input: NodeId,
}

/// 上一次构建的摘要，用于与本次构建比较
#[derive(Debug)]
struct PreviousBuild {
    build_id: usize,
    /// 每个表达式两个参数的来源（一元表达式的第二项为None）
    argument_provenances: Vec<(Provenance, Option<Provenance>)>,
    result_tensors: HashMap<TensorId, ExpressionId>,
}

impl ProcedureData {
    fn new(build_id: usize, input: &Tensor) -> Self {
        let mut register = NodeRegister::new();
        let input_node =
            register.define_node(input, false, build_id, Provenance::Leaf(ExpressionId(0)));
        Self {
            build_id,
            register,
            expressions: Vec::new(),
            result_expressions: HashMap::new(),
            result_tensors: HashMap::new(),
            input_tensor: input.id(),
            input: input_node,
        }
    }

    fn next_expression_id(&self) -> ExpressionId {
        ExpressionId(self.expressions.len())
    }

    /// 结果张量须是本次构建中首次出现的张量，且不能同时作为参数
    fn check_result(&self, result: &Tensor, arguments: &[&Tensor]) -> Result<(), GraphError> {
        if arguments.iter().any(|argument| argument.id() == result.id()) {
            return Err(GraphError::InvalidOperation(
                "表达式的结果不能同时作为其参数".to_string(),
            ));
        }
        if self.register.contains(result) {
            return Err(GraphError::InvalidOperation(format!(
                "结果张量（id={}）已在本次构建中登记过",
                result.id().value()
            )));
        }
        Ok(())
    }

    /// 参数节点：声明的输入、本次构建的结果、上一次构建的结果（承接值）都是非常量节点，其余为常量节点
    fn define_argument(&mut self, tensor: &Tensor, previous: Option<&PreviousBuild>) -> NodeId {
        if let Ok(node) = self.register.get_node(tensor) {
            return node;
        }
        if let Some(previous) = previous {
            if let Some(&source) = previous.result_tensors.get(&tensor.id()) {
                return self.register.define_node(
                    tensor,
                    false,
                    previous.build_id,
                    Provenance::Carried(source),
                );
            }
        }
        let position = self.next_expression_id();
        self.register
            .define_node(tensor, true, self.build_id, Provenance::Leaf(position))
    }

    fn define_result(&mut self, tensor: &Tensor) -> NodeId {
        let position = self.next_expression_id();
        self.result_tensors.insert(tensor.id(), position);
        self.register
            .define_node(tensor, false, self.build_id, Provenance::Result(position))
    }

    fn push(&mut self, expression: Expression) -> ExpressionId {
        let id = expression.id();
        debug!(
            "记录表达式 {id}: {}: {}",
            expression.name(),
            expression.expression_formula()
        );
        self.result_expressions.insert(expression.result(), id);
        self.expressions.push(expression);
        id
    }

    fn summarize(&self) -> PreviousBuild {
        let argument_provenances = self
            .expressions
            .iter()
            .map(|expression| {
                (
                    self.register.provenance(expression.arg1()),
                    expression.arg2().map(|arg2| self.register.provenance(arg2)),
                )
            })
            .collect();
        PreviousBuild {
            build_id: self.build_id,
            argument_provenances,
            result_tensors: self.result_tensors.clone(),
        }
    }
}

/// 过程工厂
///
/// # 示例
/// ```ignore
/// let mut factory = ProcedureFactory::with_name("rnn");
/// factory.register_constants(&[&weight]);
/// for _ in 0..2 {
///     factory.new_procedure(&x)?;
///     let h = factory.dot(&weight, &x)?;
///     let y = factory.apply_unary(&h, UnaryFunction::new(UnaryFunctionType::Tanh))?;
///     procedure = factory.end_procedure(&y)?;
/// }
/// ```
#[derive(Debug)]
pub struct ProcedureFactory {
    name: String,
    /// 已完成的构建次数
    build_count: usize,
    /// 正在进行的构建，None表示空闲
    current: Option<ProcedureData>,
    previous: Option<PreviousBuild>,
    /// 调用方登记的常量（如权重），在之后的每次构建中都会被记录
    constants: HashSet<TensorId>,
}

impl Default for ProcedureFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcedureFactory {
    pub fn new() -> Self {
        Self::with_name("default_procedure")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            build_count: 0,
            current: None,
            previous: None,
            constants: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn build_count(&self) -> usize {
        self.build_count
    }

    pub const fn is_building(&self) -> bool {
        self.current.is_some()
    }

    /// 登记常量张量（如权重）：构建中涉及它们的运算会被记录，编译后可经`Procedure::get_node`取得其节点
    pub fn register_constants(&mut self, tensors: &[&Tensor]) {
        self.constants.extend(tensors.iter().map(|tensor| tensor.id()));
    }

    /// 开始一次构建，`input`为声明的输入张量
    pub fn new_procedure(&mut self, input: &Tensor) -> Result<(), GraphError> {
        if self.current.is_some() {
            return Err(GraphError::InvalidOperation(
                "已有正在构建的过程，须先调用end_procedure".to_string(),
            ));
        }
        debug!("[{}] 开始第{}次构建", self.name, self.build_count + 1);
        self.current = Some(ProcedureData::new(self.build_count, input));
        Ok(())
    }

    // ========== 记录表达式 ==========

    /// 记录结构性二元运算（加、减、矩阵乘、逐元素乘、逐元素除）
    pub fn add_binary_expression(
        &mut self,
        arg1: &Tensor,
        arg2: &Tensor,
        result: &Tensor,
        operation: BinaryOperation,
    ) -> Result<ExpressionId, GraphError> {
        let data = Self::building(&mut self.current)?;
        data.check_result(result, &[arg1, arg2])?;
        let arg1 = data.define_argument(arg1, self.previous.as_ref());
        let arg2 = data.define_argument(arg2, self.previous.as_ref());
        let id = data.next_expression_id();
        let result = data.define_result(result);
        Ok(data.push(Expression::new_binary(operation, id, arg1, arg2, result)))
    }

    pub fn add_unary_function_expression(
        &mut self,
        arg1: &Tensor,
        result: &Tensor,
        function: UnaryFunction,
    ) -> Result<ExpressionId, GraphError> {
        let data = Self::building(&mut self.current)?;
        data.check_result(result, &[arg1])?;
        let arg1 = data.define_argument(arg1, self.previous.as_ref());
        let id = data.next_expression_id();
        let result = data.define_result(result);
        Ok(data.push(UnaryFunctionExpression::new(id, arg1, result, function).into()))
    }

    pub fn add_binary_function_expression(
        &mut self,
        arg1: &Tensor,
        arg2: &Tensor,
        result: &Tensor,
        function: BinaryFunction,
    ) -> Result<ExpressionId, GraphError> {
        let data = Self::building(&mut self.current)?;
        data.check_result(result, &[arg1, arg2])?;
        let arg1 = data.define_argument(arg1, self.previous.as_ref());
        let arg2 = data.define_argument(arg2, self.previous.as_ref());
        let id = data.next_expression_id();
        let result = data.define_result(result);
        Ok(data.push(BinaryFunctionExpression::new(id, arg1, arg2, result, function).into()))
    }

    // ========== 结束构建 ==========

    /// 结束本次构建。
    /// 首次调用返回`Ok(None)`（只用于探测形状）；之后每次都返回编译好的过程。
    /// 无论成败，本次构建涉及的张量都会与工厂解除绑定；出错时本次构建作废
    pub fn end_procedure(&mut self, output: &Tensor) -> Result<Option<Procedure>, GraphError> {
        let mut data = self
            .current
            .take()
            .ok_or_else(|| GraphError::InvalidOperation("没有正在构建的过程".to_string()))?;
        let output_node = data
            .register
            .get_node(output)
            .map_err(|_| GraphError::OutputNotRegistered)?;

        let backward =
            analysis::backward_order(&data.expressions, &data.result_expressions, output_node);
        let registered = self.registered_nodes(&data, output, output_node);
        data.register.remove_procedure_factory();

        let summary = data.summarize();
        let previous = self.previous.replace(summary);
        self.build_count += 1;
        debug!(
            "[{}] 第{}次构建结束：前向表达式{}个，反向表达式{}个",
            self.name,
            self.build_count,
            data.expressions.len(),
            backward.len()
        );

        let Some(previous) = previous else {
            debug!("[{}] 首次构建仅用于探测形状，不返回过程", self.name);
            return Ok(None);
        };
        let links = analysis::dependency_links(&previous, &data.expressions, &data.register);

        Ok(Some(Procedure::new(
            &self.name,
            data.expressions,
            backward,
            data.input,
            output_node,
            links,
            data.register.into_nodes(),
            registered,
        )))
    }

    fn building(current: &mut Option<ProcedureData>) -> Result<&mut ProcedureData, GraphError> {
        current.as_mut().ok_or_else(|| {
            GraphError::InvalidOperation("没有正在构建的过程，须先调用new_procedure".to_string())
        })
    }

    /// 编译后可按张量查找的节点：调用方登记的常量，以及声明的输入与输出
    fn registered_nodes(
        &self,
        data: &ProcedureData,
        output: &Tensor,
        output_node: NodeId,
    ) -> HashMap<TensorId, NodeId> {
        let mut registered: HashMap<TensorId, NodeId> = self
            .constants
            .iter()
            .filter_map(|&id| data.register.node_id_of(id).map(|node| (id, node)))
            .collect();
        registered.insert(data.input_tensor, data.input);
        registered.insert(output.id(), output_node);
        registered
    }

    /// 张量是否与正在进行的构建绑定（声明的输入、已登记的常量、本次或上一次构建的结果）
    fn is_attached(&self, tensor: &Tensor) -> bool {
        let Some(data) = &self.current else {
            return false;
        };
        data.register.contains(tensor)
            || self.constants.contains(&tensor.id())
            || self
                .previous
                .as_ref()
                .is_some_and(|previous| previous.result_tensors.contains_key(&tensor.id()))
    }
}
