use super::accumulator;
use crate::assert_err;
use crate::procedure::{ExpressionId, GraphError, NodeId, ProcedureFactory, Provenance};
use crate::tensor::Tensor;

#[test]
fn test_recurrent_state_creates_one_link() {
    let w = Tensor::new(&[2.], &[1, 1]);
    let (_, procedure) = accumulator(&w, 2);

    assert!(procedure.has_dependencies());
    assert_eq!(procedure.links().len(), 1);
    let link = &procedure.links()[0];
    // 节点：x n0、w n1、x*w n2、承接的h n3、新的h n4
    assert_eq!(link.producer(), NodeId(4));
    assert_eq!(link.consumer(), NodeId(3));
    assert_eq!(link.producer(), procedure.output_node());

    let carried = procedure.node(NodeId(3));
    assert!(!carried.is_constant());
    assert_eq!(carried.provenance(), Provenance::Carried(ExpressionId(1)));
    // 承接值沿用其产生时（上一次构建）的构建序号
    assert_eq!(carried.build_id(), 0);
}

#[test]
fn test_later_builds_keep_the_link() {
    let w = Tensor::new(&[2.], &[1, 1]);
    for builds in 3..6 {
        let (factory, procedure) = accumulator(&w, builds);
        assert_eq!(factory.build_count(), builds);
        assert_eq!(procedure.links().len(), 1);
        assert_eq!(procedure.links()[0].consumer(), NodeId(3));
    }
}

#[test]
fn test_changed_structure_drops_links() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[1.], &[1]);
    let b = Tensor::new(&[2.], &[1]);
    let c = Tensor::new(&[3.], &[1]);

    factory.new_procedure(&x).unwrap();
    let y = factory.add(&x, &b).unwrap();
    assert!(factory.end_procedure(&y).unwrap().is_none());

    // 第二次构建多了一个表达式，并使用了上一次的结果
    factory.new_procedure(&x).unwrap();
    let h = factory.add(&y, &x).unwrap();
    let z = factory.multiply(&h, &c).unwrap();
    let mut procedure = factory.end_procedure(&z).unwrap().unwrap();
    assert!(!procedure.has_dependencies());
    assert_eq!(procedure.forward_expressions().len(), 2);

    // 承接值没有关联为其赋值
    let carried = NodeId(1);
    assert!(procedure.node(carried).provenance().is_carried());
    assert_err!(
        procedure.calculate_expression(0, &x),
        GraphError::MissingValue(carried, 0)
    );
}

#[test]
fn test_shared_carried_value_is_linked_once() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[0.5], &[1]);
    let mut h = Tensor::new(&[1.], &[1]);
    // 登记初值，使首次构建也记录h * h
    factory.register_constants(&[&h]);
    let mut procedure = None;
    for _ in 0..2 {
        factory.new_procedure(&x).unwrap();
        // h * h + x：同一个承接值出现在两个参数位置
        let hh = factory.multiply(&h, &h).unwrap();
        h = factory.add(&hh, &x).unwrap();
        procedure = factory.end_procedure(&h).unwrap();
    }
    let mut procedure = procedure.unwrap();
    assert_eq!(procedure.links().len(), 1);

    // h_0 = 0 + x（首个索引没有前值，承接0）
    procedure.calculate_expression(0, &x).unwrap();
    assert_eq!(procedure.output_value(0).unwrap(), &Tensor::new(&[0.5], &[1]));
    // h_1 = 0.5 * 0.5 + 0.5
    procedure.calculate_expression(1, &x).unwrap();
    assert_eq!(procedure.output_value(1).unwrap(), &Tensor::new(&[0.75], &[1]));
}

#[test]
fn test_input_feedback_is_not_linked() {
    // 上一次的结果未被使用时不会产生关联
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[1.], &[1]);
    let b = Tensor::new(&[2.], &[1]);
    let mut procedure = None;
    for _ in 0..3 {
        factory.new_procedure(&x).unwrap();
        let y = factory.subtract(&x, &b).unwrap();
        procedure = factory.end_procedure(&y).unwrap();
    }
    assert!(!procedure.unwrap().has_dependencies());
}
