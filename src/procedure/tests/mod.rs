mod dependency;
mod descriptor;
mod factory;
mod node;

use crate::procedure::{GraphError, Procedure, ProcedureFactory};
use crate::tensor::Tensor;

/// 同一段构建代码连续执行两次（第一次只探测形状），返回编译好的过程
fn compile<F>(factory: &mut ProcedureFactory, input: &Tensor, build: F) -> Procedure
where
    F: Fn(&mut ProcedureFactory, &Tensor) -> Result<Tensor, GraphError>,
{
    let mut procedure = None;
    for _ in 0..2 {
        factory.new_procedure(input).unwrap();
        let output = build(factory, input).unwrap();
        procedure = factory.end_procedure(&output).unwrap();
    }
    procedure.unwrap()
}

/// `y = (a + b) * c`，其中a为输入，b、c为登记的常量
fn sum_then_multiply(b: &Tensor, c: &Tensor) -> (ProcedureFactory, Procedure) {
    let mut factory = ProcedureFactory::with_name("sum_then_multiply");
    factory.register_constants(&[b, c]);
    let a = Tensor::new(&[2.], &[1]);
    let procedure = compile(&mut factory, &a, |factory, a| {
        let s = factory.add(a, b)?;
        factory.multiply(&s, c)
    });
    (factory, procedure)
}

/// 累加器：`h_t = x_t * w + h_{t-1}`，h的初值为0
fn accumulator(w: &Tensor, builds: usize) -> (ProcedureFactory, Procedure) {
    let mut factory = ProcedureFactory::with_name("accumulator");
    factory.register_constants(&[w]);
    let x = Tensor::new(&[1.], &[1, 1]);
    let mut h = Tensor::zeros(&[1, 1]);
    let mut procedure = None;
    for _ in 0..builds {
        factory.new_procedure(&x).unwrap();
        let xw = factory.multiply(&x, w).unwrap();
        h = factory.add(&xw, &h).unwrap();
        procedure = factory.end_procedure(&h).unwrap();
    }
    (factory, procedure.unwrap())
}

/// 梯度核对所用的随机种子：每种表达式都在这几组随机输入上各核对一次
const SEEDS: [u64; 3] = [3, 17, 42];

/// 以`sum(output)`为目标，用中心差分核对输入梯度
fn check_input_gradient<F>(input: &Tensor, build: F)
where
    F: Fn(&mut ProcedureFactory, &Tensor) -> Result<Tensor, GraphError>,
{
    let eps = 1e-6;
    let mut factory = ProcedureFactory::new();
    let mut procedure = compile(&mut factory, input, build);

    procedure.calculate_expression(0, input).unwrap();
    let output_shape = procedure.output_value(0).unwrap().shape().to_vec();
    procedure
        .calculate_gradient(0, &Tensor::ones(&output_shape))
        .unwrap();
    let analytic = procedure.input_gradient(0).unwrap().to_vec();

    let data = input.to_vec();
    for i in 0..data.len() {
        let mut plus = data.clone();
        plus[i] += eps;
        let mut minus = data.clone();
        minus[i] -= eps;
        procedure
            .calculate_expression(1, &Tensor::new(&plus, input.shape()))
            .unwrap();
        let f_plus = procedure.output_value(1).unwrap().sum();
        procedure
            .calculate_expression(2, &Tensor::new(&minus, input.shape()))
            .unwrap();
        let f_minus = procedure.output_value(2).unwrap().sum();
        let numeric = (f_plus - f_minus) / (2. * eps);
        approx::assert_abs_diff_eq!(analytic[i], numeric, epsilon = 1e-5);
    }
}
