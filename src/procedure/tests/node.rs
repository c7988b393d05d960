use crate::assert_err;
use crate::procedure::{ExpressionId, GraphError, Node, NodeId, NodeRegister, Provenance};
use crate::tensor::Tensor;

fn leaf() -> Provenance {
    Provenance::Leaf(ExpressionId(0))
}

#[test]
fn test_constant_node_shares_value() {
    let weight = Tensor::new(&[1., 2.], &[2]);
    let mut node = Node::new(NodeId(0), &weight, true, 0, leaf());
    assert_eq!(node.value(0).unwrap(), &weight);
    assert_eq!(node.value(42).unwrap(), &weight);

    // 常量节点忽略按索引写入
    node.set_value(3, Tensor::new(&[9., 9.], &[2]));
    assert_eq!(node.value(3).unwrap(), &weight);
    assert_eq!(node.indices().count(), 0);

    node.set_constant_value(&Tensor::new(&[5., 6.], &[2])).unwrap();
    assert_eq!(node.value(0).unwrap(), &Tensor::new(&[5., 6.], &[2]));
    assert_err!(
        node.set_constant_value(&Tensor::new(&[1.], &[1])),
        GraphError::InvalidOperation(_)
    );
}

#[test]
fn test_variable_node_values_per_index() {
    let template = Tensor::zeros(&[2]);
    let mut node = Node::new(NodeId(1), &template, false, 0, leaf());
    assert!(node.value(0).is_none());
    node.set_value(0, Tensor::new(&[1., 1.], &[2]));
    node.set_value(4, Tensor::new(&[4., 4.], &[2]));
    assert_eq!(node.indices().collect::<Vec<_>>(), vec![0, 4]);
    assert_eq!(node.value(4).unwrap(), &Tensor::new(&[4., 4.], &[2]));
    assert_err!(
        node.set_constant_value(&template),
        GraphError::InvalidOperation(_)
    );

    node.reset_index(0);
    assert!(node.value(0).is_none());
    assert!(node.value(4).is_some());
    node.reset();
    assert_eq!(node.indices().count(), 0);
    assert_eq!(node.empty_tensor(), Tensor::zeros(&[2]));
}

#[test]
fn test_gradient_accumulation() {
    let mut node = Node::new(NodeId(0), &Tensor::zeros(&[2]), false, 0, leaf());
    node.add_gradient(0, &Tensor::new(&[1., 2.], &[2])).unwrap();
    node.add_gradient(0, &Tensor::new(&[3., 4.], &[2])).unwrap();
    assert_eq!(node.gradient(0).unwrap(), &Tensor::new(&[4., 6.], &[2]));

    // 首次写入即为减法时取负
    node.subtract_gradient(1, &Tensor::new(&[1., 2.], &[2])).unwrap();
    assert_eq!(node.gradient(1).unwrap(), &Tensor::new(&[-1., -2.], &[2]));
    node.subtract_gradient(1, &Tensor::new(&[1., 1.], &[2])).unwrap();
    assert_eq!(node.gradient(1).unwrap(), &Tensor::new(&[-2., -3.], &[2]));

    assert_eq!(node.gradient_sum().unwrap().unwrap(), Tensor::new(&[2., 3.], &[2]));
    assert_eq!(node.gradient_mean().unwrap().unwrap(), Tensor::new(&[1., 1.5], &[2]));

    // set_gradient直接覆盖
    node.set_gradient(0, Tensor::new(&[0., 0.], &[2]));
    assert_eq!(node.gradient(0).unwrap(), &Tensor::zeros(&[2]));

    assert_err!(
        node.add_gradient(0, &Tensor::new(&[1., 2., 3.], &[3])),
        GraphError::Tensor(_)
    );
}

#[test]
fn test_gradient_sum_reports_shape_mismatch() {
    let mut node = Node::new(NodeId(0), &Tensor::zeros(&[2]), false, 0, leaf());
    node.set_gradient(0, Tensor::new(&[1., 2.], &[2]));
    node.set_gradient(1, Tensor::new(&[1., 2., 3.], &[3]));
    assert_err!(node.gradient_sum(), GraphError::Tensor(_));
    assert_err!(node.gradient_mean(), GraphError::Tensor(_));

    // 形状一致后恢复正常
    node.set_gradient(1, Tensor::new(&[3., 4.], &[2]));
    assert_eq!(node.gradient_sum().unwrap().unwrap(), Tensor::new(&[4., 6.], &[2]));
}

#[test]
fn test_scalar_node_sums_gradient() {
    let mut bias = Node::new(NodeId(0), &Tensor::new(&[0.5], &[1]), true, 0, leaf());
    bias.add_gradient(0, &Tensor::new(&[1., 2., 3.], &[3])).unwrap();
    bias.add_gradient(0, &Tensor::new(&[1., 1.], &[2])).unwrap();
    assert_eq!(bias.gradient(0).unwrap(), &Tensor::new(&[8.], &[1]));
    assert!(bias.gradient_mean().unwrap().is_some());
}

#[test]
fn test_stop_gradient_node() {
    let mut node = Node::new(NodeId(0), &Tensor::zeros(&[1]), false, 0, leaf());
    node.set_stop_gradient(true);
    node.add_gradient(0, &Tensor::new(&[1.], &[1])).unwrap();
    assert!(node.gradient(0).is_none());
    assert!(node.gradient_mean().unwrap().is_none());
    node.set_stop_gradient(false);
    node.add_gradient(0, &Tensor::new(&[1.], &[1])).unwrap();
    assert!(node.gradient(0).is_some());
}

#[test]
fn test_node_register() {
    let mut register = NodeRegister::new();
    assert!(register.is_empty());
    let x = Tensor::new(&[1.], &[1]);
    let w = Tensor::new(&[2.], &[1]);

    let x_node = register.define_node(&x, false, 0, leaf());
    let w_node = register.define_node(&w, true, 0, Provenance::Leaf(ExpressionId(1)));
    // 同一张量重复登记返回同一节点
    assert_eq!(register.define_node(&x, true, 3, Provenance::Result(ExpressionId(2))), x_node);
    assert_eq!(register.len(), 2);
    assert_eq!(x_node, NodeId(0));
    assert_eq!(w_node, NodeId(1));

    assert!(register.contains(&w));
    assert_eq!(register.get_node(&w).unwrap(), w_node);
    assert_eq!(register.get_expression_id(w_node), ExpressionId(1));
    assert_eq!(register.provenance(x_node), leaf());
    assert!(register.node(w_node).is_constant());
    assert!(!register.node(x_node).is_constant());

    // 克隆得到的是新的张量身份
    assert_err!(register.get_node(&w.clone()), GraphError::NodeNotFound(_));

    register.remove_procedure_factory();
    assert!(!register.contains(&x));
    assert_eq!(register.len(), 2);
}
