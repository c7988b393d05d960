/*
 * @Author       : 老董
 * @Description  : 跨构建的节点关联：把生产者（某表达式的结果）在前一索引上的值传给消费者（参数），
 *                 反向时再把消费者在后一索引上的梯度传回生产者。
 */

use super::{GraphError, Node, NodeId};
use crate::tensor::Tensor;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct NodeLink {
    producer: NodeId,
    consumer: NodeId,
    /// 上一次读生产者的值的结果（未读到则为None）
    previous_value: Option<Tensor>,
    /// 上一次读消费者的梯度的结果（未读到则为None）
    previous_gradient: Option<Tensor>,
}

impl NodeLink {
    pub(crate) const fn new(producer: NodeId, consumer: NodeId) -> Self {
        Self {
            producer,
            consumer,
            previous_value: None,
            previous_gradient: None,
        }
    }

    pub const fn producer(&self) -> NodeId {
        self.producer
    }

    pub const fn consumer(&self) -> NodeId {
        self.consumer
    }

    /// 前向：`consumer.value[index] = producer.value[index - 1]`。
    /// 前一索引无值时依次退回到缓存的上一次读数、与生产者同形的全0张量。
    /// 缓存总是记下本次的读数，故缓存至多顶替一次缺失，连续缺失时取全0
    pub fn update_expression(&mut self, nodes: &mut [Node], index: usize) {
        let producer = &nodes[self.producer.0];
        let read = index
            .checked_sub(1)
            .and_then(|previous| producer.value(previous))
            .cloned();
        let value = match (&read, &self.previous_value) {
            (Some(value), _) | (None, Some(value)) => value.clone(),
            (None, None) => producer.empty_tensor(),
        };
        trace!(
            "索引{index}：{} -> {}，{}",
            self.producer,
            self.consumer,
            if read.is_some() { "承接前一索引的值" } else { "无前一索引的值" }
        );
        self.previous_value = read;
        nodes[self.consumer.0].set_value(index, value);
    }

    /// 反向：`producer.gradient[index] += consumer.gradient[index + 1]`。
    /// 后一索引无梯度时依次退回到缓存的上一次读数、与消费者同形的全0张量
    pub fn update_gradient(&mut self, nodes: &mut [Node], index: usize) -> Result<(), GraphError> {
        let consumer = &nodes[self.consumer.0];
        let read = consumer.gradient(index + 1).cloned();
        let gradient = match (&read, &self.previous_gradient) {
            (Some(gradient), _) | (None, Some(gradient)) => gradient.clone(),
            (None, None) => consumer.empty_tensor(),
        };
        self.previous_gradient = read;
        nodes[self.producer.0].add_gradient(index, &gradient)
    }

    /// 清除缓存的读数（如开始一段新序列时切断连续性）
    pub fn reset(&mut self) {
        self.previous_value = None;
        self.previous_gradient = None;
    }
}
