/*
 * @Author       : 老董
 * @Description  : 编译期分析：反向表达式顺序、跨构建依赖（NodeLink）
 */

use super::PreviousBuild;
use crate::procedure::{
    Expression, ExpressionId, NodeId, NodeLink, NodeRegister, Provenance, TraitExpression,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// 从输出节点出发，用栈遍历找出所有需要反向求值的表达式（每个表达式只出现一次），
/// 再按序号从大到小排列：序号即创建顺序，
/// 故任一表达式执行反向规则前，其结果的所有下游贡献都已累加完毕
pub(super) fn backward_order(
    expressions: &[Expression],
    result_expressions: &HashMap<NodeId, ExpressionId>,
    output: NodeId,
) -> Vec<Expression> {
    let mut seen = HashSet::new();
    let mut stack = vec![output];
    while let Some(node) = stack.pop() {
        // 没有产生它的表达式，即为叶子节点
        let Some(&expression_id) = result_expressions.get(&node) else {
            continue;
        };
        if !seen.insert(expression_id) {
            continue;
        }
        let expression = &expressions[expression_id.0];
        stack.push(expression.arg1());
        if let Some(arg2) = expression.arg2() {
            stack.push(arg2);
        }
    }

    let mut ids = seen.into_iter().collect::<Vec<_>>();
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.into_iter()
        .map(|id| expressions[id.0].clone())
        .collect()
}

/// 比较上一次与本次构建中同一位置的参数来源，找出承接自上一次构建结果的参数。
/// 生产者取本次构建中处于同一位置的表达式的结果节点，使过程在相邻索引间传递该状态。
/// 两次构建的表达式数量不同时视为结构已变化，不建立任何关联
pub(super) fn dependency_links(
    previous: &PreviousBuild,
    expressions: &[Expression],
    register: &NodeRegister,
) -> Vec<NodeLink> {
    if previous.argument_provenances.len() != expressions.len() {
        warn!(
            "前后两次构建的表达式数量不同（{} vs {}），清空所有跨构建关联",
            previous.argument_provenances.len(),
            expressions.len()
        );
        return Vec::new();
    }

    let mut links = Vec::new();
    let mut consumers = HashSet::new();
    for (expression, &(previous_arg1, previous_arg2)) in
        expressions.iter().zip(&previous.argument_provenances)
    {
        let mut slots = vec![(previous_arg1, expression.arg1())];
        if let (Some(previous_arg2), Some(arg2)) = (previous_arg2, expression.arg2()) {
            slots.push((previous_arg2, arg2));
        }
        for (previous_provenance, consumer) in slots {
            let current_provenance = register.provenance(consumer);
            let Provenance::Carried(source) = current_provenance else {
                if previous_provenance != current_provenance {
                    debug!(
                        "表达式 {} 的参数{consumer}来源有变（{previous_provenance:?} -> {current_provenance:?}），但并非承接值，忽略",
                        expression.id()
                    );
                }
                continue;
            };
            // 同一承接值被多个表达式使用时只建立一个关联
            if !consumers.insert(consumer) {
                continue;
            }
            let Some(producer) = expressions.get(source.0).map(|e| e.result()) else {
                continue;
            };
            debug!(
                "建立跨构建关联：{producer} -> {consumer}（来源表达式 {source}，上一次为{previous_provenance:?}）"
            );
            links.push(NodeLink::new(producer, consumer));
        }
    }
    links
}
