//! # Only Autograd
//!
//! `only_autograd`用纯rust实现一个可回放的自动微分过程构建器：
//! 先用[`ProcedureFactory`](procedure::ProcedureFactory)逐次记录张量运算，
//! 再把记录编译为[`Procedure`](procedure::Procedure)，之后即可在任意多个索引（如时间步）上
//! 重复进行前向求值与反向求梯度。
//!
//! 前后两次构建之间若某次运算的结果被下一次构建当作参数使用（如RNN的隐藏状态），
//! 编译时会自动推断出跨构建的依赖，回放时该状态便在相邻索引之间传递（即BPTT）。
//!

pub mod errors;
pub mod procedure;
pub mod tensor;
pub mod utils;

pub use procedure::{GraphError, Procedure, ProcedureFactory};
pub use tensor::Tensor;
