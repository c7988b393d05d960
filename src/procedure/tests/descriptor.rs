use super::{accumulator, compile, sum_then_multiply};
use crate::procedure::{
    ExpressionId, ExpressionKindDescriptor, LinkDescriptor, ProcedureDescriptor, ProcedureFactory,
    Provenance,
};
use crate::tensor::{Tensor, UnaryFunction, UnaryFunctionType};

#[test]
fn test_describe_procedure() {
    let b = Tensor::new(&[3.], &[1]);
    let c = Tensor::new(&[4.], &[1]);
    let (_, procedure) = sum_then_multiply(&b, &c);
    let descriptor = procedure.describe();

    assert_eq!(descriptor.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(descriptor.name, "sum_then_multiply");
    assert_eq!(descriptor.input, 0);
    assert_eq!(descriptor.output, 4);
    assert_eq!(descriptor.nodes.len(), 5);
    assert_eq!(descriptor.constant_count(), 2);
    assert_eq!(descriptor.nodes[2].provenance, Provenance::Result(ExpressionId(0)));
    assert_eq!(descriptor.nodes[3].shape, vec![1]);

    assert_eq!(descriptor.expressions.len(), 2);
    assert_eq!(descriptor.expressions[0].kind, ExpressionKindDescriptor::Add);
    assert_eq!(descriptor.expressions[1].kind, ExpressionKindDescriptor::Multiply);
    assert_eq!(descriptor.expressions[1].arg2, Some(3));
    assert_eq!(descriptor.backward, vec![1, 0]);
    assert!(descriptor.links.is_empty());
}

#[test]
fn test_descriptor_json_round_trip() {
    let w = Tensor::new(&[2.], &[1, 1]);
    let (_, procedure) = accumulator(&w, 2);
    let descriptor = procedure.describe();
    assert_eq!(
        descriptor.links,
        vec![LinkDescriptor {
            producer: 4,
            consumer: 3
        }]
    );

    let json = descriptor.to_json().unwrap();
    assert!(json.contains("\"type\": \"Multiply\""));
    assert!(json.contains("\"Carried\": 1"));
    let parsed = ProcedureDescriptor::from_json(&json).unwrap();
    assert_eq!(parsed, descriptor);
}

#[test]
fn test_function_kind_names() {
    let mut factory = ProcedureFactory::new();
    let x = Tensor::new(&[0.5], &[1]);
    let procedure = compile(&mut factory, &x, |factory, x| {
        let y = factory.apply_unary(x, UnaryFunction::new(UnaryFunctionType::Softplus))?;
        factory.apply_unary(&y, UnaryFunction::custom(|v| 2. * v, |_| 2.))
    });
    let descriptor = procedure.describe();
    assert_eq!(
        descriptor.expressions[0].kind,
        ExpressionKindDescriptor::UnaryFunction {
            function: "SOFTPLUS".to_string()
        }
    );
    assert_eq!(
        descriptor.expressions[1].kind,
        ExpressionKindDescriptor::UnaryFunction {
            function: "CUSTOM".to_string()
        }
    );
    assert_eq!(descriptor.expressions[1].arg2, None);

    // 无关联时不输出links字段，解析时补为空
    let json = descriptor.to_json().unwrap();
    assert!(!json.contains("links"));
    assert!(!json.contains("arg2"));
    assert!(ProcedureDescriptor::from_json(&json).unwrap().links.is_empty());
    assert!(ProcedureDescriptor::from_json("{\"name\": 1}").is_err());
}
