use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{ArrayView2, Ix2};

impl Tensor {
    /// 实现矩阵乘法（点积）。只接受2阶张量，否则会触发panic。
    /// 需要保证前一个张量的列数（col）等于后一个张量的行数（row），否则也会触发panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        self.try_mat_mul(other).unwrap_or_else(|e| panic!("{e}"))
    }

    /// `mat_mul`的不panic版本
    pub fn try_mat_mul(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        let self_data = self.as_matrix(Operator::Dot)?;
        let other_data = other.as_matrix(Operator::Dot)?;
        // 检查前一个张量的列数是否等于后一个张量的行数
        if self_data.ncols() != other_data.nrows() {
            return Err(TensorError::OperatorError {
                operator: Operator::Dot,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            });
        }
        Ok(Tensor::from_array(self_data.dot(&other_data).into_dyn()))
    }

    /// 矩阵转置。只接受2阶张量
    pub fn transpose(&self) -> Tensor {
        self.try_transpose().unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_transpose(&self) -> Result<Tensor, TensorError> {
        let data = self.as_matrix(Operator::Transpose)?;
        Ok(Tensor::from_array(data.t().to_owned().into_dyn()))
    }

    // 将动态维度视图转换为2阶视图
    fn as_matrix(&self, operator: Operator) -> Result<ArrayView2<'_, f64>, TensorError> {
        self.data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| TensorError::NotMatrix {
                operator,
                shape: self.shape().to_vec(),
            })
    }
}
