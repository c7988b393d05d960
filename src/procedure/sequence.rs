/*
 * @Author       : 老董
 * @Description  : 在一段按索引排列的序列上整体回放过程
 */

use super::{GraphError, Procedure};
use crate::tensor::Tensor;
use std::collections::BTreeMap;

/// 索引 -> 张量（输入序列、输出序列、梯度序列）
pub type Sequence = BTreeMap<usize, Tensor>;

impl Procedure {
    /// 按索引升序逐个前向求值，返回各索引处的输出
    pub fn calculate_expression_sequence(&mut self, inputs: &Sequence) -> Result<Sequence, GraphError> {
        let mut outputs = Sequence::new();
        for (&index, input) in inputs {
            self.calculate_expression(index, input)?;
            outputs.insert(index, self.output_value(index)?.clone());
        }
        Ok(outputs)
    }

    /// 按索引降序逐个反向求值，返回各索引处输入的梯度。
    /// `steps`限制截断反向传播的步数（从最大的索引算起），None或0表示整段序列；
    /// 输入不参与任何运算时其梯度为全0
    pub fn calculate_gradient_sequence(
        &mut self,
        output_gradients: &Sequence,
        steps: Option<usize>,
    ) -> Result<Sequence, GraphError> {
        let steps = match steps {
            Some(steps) if steps > 0 => steps,
            _ => output_gradients.len(),
        };
        let mut input_gradients = Sequence::new();
        for (&index, gradient) in output_gradients.iter().rev().take(steps) {
            let input = self.calculate_gradient(index, gradient)?;
            let node = self.node(input);
            let gradient = node
                .gradient(index)
                .cloned()
                .unwrap_or_else(|| node.empty_tensor());
            input_gradients.insert(index, gradient);
        }
        Ok(input_gradients)
    }
}
