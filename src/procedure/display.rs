/*
 * @Author       : 老董
 * @Description  : 过程的文本展示（表达式链、梯度链、摘要）
 */

use super::{Procedure, TraitExpression};
use std::fmt;

impl Procedure {
    /// 前向表达式链，每行形如`表达式 2: ADD: n0 + n1 = n2`
    pub fn expression_chain(&self) -> Vec<String> {
        self.forward
            .iter()
            .map(|e| format!("表达式 {}: {}: {}", e.id(), e.name(), e.expression_formula()))
            .collect()
    }

    /// 反向梯度链（按反向执行顺序）
    pub fn gradient_chain(&self) -> Vec<String> {
        self.backward
            .iter()
            .map(|e| format!("表达式 {}: {}: {}", e.id(), e.name(), e.gradient_formula()))
            .collect()
    }

    pub fn summary_string(&self) -> String {
        let constants = self.nodes.iter().filter(|node| node.is_constant()).count();
        let mut lines = vec![
            format!("过程[{}]", self.name),
            format!(
                "节点{}个（常量{}个），输入{}，输出{}",
                self.nodes.len(),
                constants,
                self.input,
                self.output
            ),
            "前向：".to_string(),
        ];
        lines.extend(self.expression_chain().into_iter().map(|line| format!("  {line}")));
        lines.push("反向：".to_string());
        lines.extend(self.gradient_chain().into_iter().map(|line| format!("  {line}")));
        if self.has_dependencies() {
            lines.push("关联：".to_string());
            lines.extend(
                self.links
                    .iter()
                    .map(|link| format!("  {} -> {}", link.producer(), link.consumer())),
            );
        }
        lines.join("\n")
    }

    /// 打印摘要
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary_string())
    }
}
