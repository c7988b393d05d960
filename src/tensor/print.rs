use crate::tensor::Tensor;
use ndarray::{Array, IxDyn};
use std::fmt;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn display_recursive(
            f: &mut fmt::Formatter,
            data: &Array<f64, IxDyn>,
            indices: &mut Vec<usize>,
            depth: usize,
            rank: usize,
        ) -> fmt::Result {
            if depth == rank {
                write!(f, "{:8.4}", data[&indices[..]])?;
            } else {
                write!(f, "[")?;
                let len = data.shape()[depth];
                for i in 0..len {
                    indices[depth] = i;
                    display_recursive(f, data, indices, depth + 1, rank)?;
                    if i + 1 != len {
                        write!(f, ", ")?;
                        if depth == 0 && rank > 1 {
                            write!(f, "\n ")?;
                        }
                    }
                }
                write!(f, "]")?;
            }
            Ok(())
        }

        let shape = self.shape();
        let rank = shape.len();
        if rank > 2 {
            return write!(
                f,
                "<对于阶数大于二（rank>2）的张量（形状：{shape:?}）无法展示具体数据>"
            );
        }
        let mut indices = vec![0; rank];
        display_recursive(f, &self.data, &mut indices, 0, rank)?;
        write!(f, "\n形状: {shape:?}")
    }
}
