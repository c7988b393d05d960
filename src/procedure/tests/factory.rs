use super::sum_then_multiply;
use crate::assert_err;
use crate::procedure::{
    BinaryOperation, GraphError, NodeId, ProcedureFactory, Provenance, TraitExpression,
};
use crate::tensor::{Tensor, UnaryFunction, UnaryFunctionType};

#[test]
fn test_first_build_returns_none() {
    let mut factory = ProcedureFactory::new();
    assert_eq!(factory.name(), "default_procedure");
    assert!(!factory.is_building());

    let x = Tensor::new(&[1., 2.], &[2]);
    let b = Tensor::new(&[3., 4.], &[2]);
    factory.new_procedure(&x).unwrap();
    assert!(factory.is_building());
    let y = factory.add(&x, &b).unwrap();
    assert_eq!(y, Tensor::new(&[4., 6.], &[2]));
    assert!(factory.end_procedure(&y).unwrap().is_none());
    assert!(!factory.is_building());
    assert_eq!(factory.build_count(), 1);

    factory.new_procedure(&x).unwrap();
    let y = factory.add(&x, &b).unwrap();
    let procedure = factory.end_procedure(&y).unwrap().unwrap();
    assert_eq!(factory.build_count(), 2);
    assert_eq!(procedure.name(), "default_procedure");
    assert_eq!(procedure.forward_expressions().len(), 1);
    assert!(!procedure.has_dependencies());

    // 之后的每次构建都返回过程
    factory.new_procedure(&x).unwrap();
    let y = factory.add(&x, &b).unwrap();
    assert!(factory.end_procedure(&y).unwrap().is_some());
    assert_eq!(factory.build_count(), 3);
}

#[test]
fn test_expression_ids_follow_creation_order() {
    let b = Tensor::new(&[3.], &[1]);
    let c = Tensor::new(&[4.], &[1]);
    let (_, procedure) = sum_then_multiply(&b, &c);

    let forward = procedure.forward_expressions();
    assert_eq!(forward.len(), 2);
    for (position, expression) in forward.iter().enumerate() {
        assert_eq!(expression.id().0, position);
    }
    assert_eq!(forward[0].name(), "ADD");
    assert_eq!(forward[1].name(), "MULTIPLY");
    // 输入n0、常量b为n1、中间结果n2、常量c为n3、输出n4
    assert_eq!(forward[0].arg1(), NodeId(0));
    assert_eq!(forward[0].arg2(), Some(NodeId(1)));
    assert_eq!(forward[0].result(), NodeId(2));
    assert_eq!(forward[1].arg2(), Some(NodeId(3)));
    assert_eq!(procedure.output_node(), NodeId(4));
    assert_eq!(procedure.input_node(), NodeId(0));
}

#[test]
fn test_node_kinds_and_provenance() {
    let b = Tensor::new(&[3.], &[1]);
    let c = Tensor::new(&[4.], &[1]);
    let (_, procedure) = sum_then_multiply(&b, &c);

    let input = procedure.node(NodeId(0));
    assert!(!input.is_constant());
    assert_eq!(input.provenance(), Provenance::Leaf(crate::procedure::ExpressionId(0)));

    let b_node = procedure.node(procedure.get_node(&b).unwrap());
    assert!(b_node.is_constant());
    assert_eq!(b_node.build_id(), 1);

    let c_node = procedure.node(procedure.get_node(&c).unwrap());
    assert!(c_node.is_constant());
    // c首次出现于表达式1
    assert_eq!(c_node.provenance().expression_id().0, 1);

    let s_node = procedure.node(NodeId(2));
    assert!(!s_node.is_constant());
    assert_eq!(s_node.provenance(), Provenance::Result(crate::procedure::ExpressionId(0)));
}

#[test]
fn test_helpers_without_building_only_compute() {
    let mut factory = ProcedureFactory::new();
    let a = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let b = Tensor::new(&[2., 2., 2., 2.], &[2, 2]);

    assert_eq!(factory.add(&a, &b).unwrap(), Tensor::new(&[3., 4., 5., 6.], &[2, 2]));
    assert_eq!(factory.subtract(&a, &b).unwrap(), Tensor::new(&[-1., 0., 1., 2.], &[2, 2]));
    assert_eq!(factory.multiply(&a, &b).unwrap(), Tensor::new(&[2., 4., 6., 8.], &[2, 2]));
    assert_eq!(factory.divide(&a, &b).unwrap(), Tensor::new(&[0.5, 1., 1.5, 2.], &[2, 2]));
    assert_eq!(factory.dot(&a, &b).unwrap(), Tensor::new(&[6., 6., 14., 14.], &[2, 2]));
    let squared = factory
        .apply_unary(&a, UnaryFunction::new(UnaryFunctionType::Square))
        .unwrap();
    assert_eq!(squared, Tensor::new(&[1., 4., 9., 16.], &[2, 2]));
    assert_eq!(factory.build_count(), 0);
    assert!(!factory.is_building());
}

#[test]
fn test_detached_arguments_are_not_recorded() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[1.], &[1]);
    let p = Tensor::new(&[2.], &[1]);
    let q = Tensor::new(&[3.], &[1]);

    factory.new_procedure(&x).unwrap();
    let detached = factory.add(&p, &q).unwrap();
    assert_eq!(detached, Tensor::new(&[5.], &[1]));
    // 未被记录的结果不能作为输出
    assert_err!(factory.end_procedure(&detached), GraphError::OutputNotRegistered);
    assert!(!factory.is_building());
}

#[test]
fn test_registered_constant_is_attached() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[1.], &[1]);
    let w = Tensor::new(&[2.], &[1]);
    let v = Tensor::new(&[5.], &[1]);
    factory.register_constants(&[&w]);

    let mut procedure = None;
    for _ in 0..2 {
        factory.new_procedure(&x).unwrap();
        let wv = factory.multiply(&w, &v).unwrap();
        let y = factory.add(&wv, &x).unwrap();
        procedure = factory.end_procedure(&y).unwrap();
    }
    let mut procedure = procedure.unwrap();
    // w已登记，因此w * v也被记录
    assert_eq!(procedure.forward_expressions().len(), 2);
    procedure.calculate_expression(0, &x).unwrap();
    assert_eq!(procedure.output_value(0).unwrap(), &Tensor::new(&[11.], &[1]));

    // v未登记，不能按张量查找
    assert_err!(procedure.get_node(&v), GraphError::NodeNotFound(_));
    assert!(procedure.get_node(&w).is_ok());
}

#[test]
fn test_raw_recording_api() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[2.], &[1]);
    let b = Tensor::new(&[5.], &[1]);

    let mut procedure = None;
    for _ in 0..2 {
        factory.new_procedure(&x).unwrap();
        let y = &x - &b;
        let id = factory
            .add_binary_expression(&x, &b, &y, BinaryOperation::Subtract)
            .unwrap();
        assert_eq!(id.0, 0);
        let z = UnaryFunction::new(UnaryFunctionType::Abs).apply_function(&y);
        factory
            .add_unary_function_expression(&y, &z, UnaryFunction::new(UnaryFunctionType::Abs))
            .unwrap();
        procedure = factory.end_procedure(&z).unwrap();
    }
    let mut procedure = procedure.unwrap();
    procedure.calculate_expression(0, &x).unwrap();
    assert_eq!(procedure.output_value(0).unwrap(), &Tensor::new(&[3.], &[1]));
    procedure
        .calculate_gradient(0, &Tensor::new(&[1.], &[1]))
        .unwrap();
    assert_eq!(procedure.input_gradient(0).unwrap(), &Tensor::new(&[-1.], &[1]));
}
