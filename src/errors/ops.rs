use std::fmt::{self, Display};

/// 张量的二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    Div,
    Dot,
    Transpose,
    ApplyBinary,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::Add => "相加",
            Operator::AddAssign => "自相加",
            Operator::Sub => "相减",
            Operator::SubAssign => "自相减",
            Operator::Mul => "逐元素相乘",
            Operator::Div => "逐元素相除",
            Operator::Dot => "矩阵相乘",
            Operator::Transpose => "转置",
            Operator::ApplyBinary => "应用二元函数",
        };
        write!(f, "{}", operation_name)
    }
}
