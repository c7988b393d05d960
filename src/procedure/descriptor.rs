/*
 * @Author       : 老董
 * @Description  : 过程描述符（Procedure Descriptor）
 *                 编译后过程的可序列化结构快照，用于调试输出与比较；不含数值，也不能据此重建过程
 */

use super::{Expression, NodeId, Procedure, Provenance, TraitExpression};
use serde::{Deserialize, Serialize};

/// 过程的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub name: String,
    /// 输入节点 ID
    pub input: usize,
    /// 输出节点 ID
    pub output: usize,
    pub nodes: Vec<NodeDescriptor>,
    /// 前向表达式（按求值顺序）
    pub expressions: Vec<ExpressionDescriptor>,
    /// 反向顺序（表达式 ID 列表）
    pub backward: Vec<usize>,
    /// 跨构建关联，无关联时省略
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: usize,
    pub shape: Vec<usize>,
    pub constant: bool,
    pub provenance: Provenance,
}

/// 表达式描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDescriptor {
    pub id: usize,
    pub kind: ExpressionKindDescriptor,
    pub arg1: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg2: Option<usize>,
    pub result: usize,
}

/// 表达式类型描述（函数类表达式附带函数名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpressionKindDescriptor {
    UnaryFunction { function: String },
    BinaryFunction { function: String },
    Add,
    Subtract,
    Dot,
    Multiply,
    Divide,
}

/// 关联描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub producer: usize,
    pub consumer: usize,
}

impl ProcedureDescriptor {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 常量节点个数
    pub fn constant_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.constant).count()
    }
}

impl From<&Expression> for ExpressionDescriptor {
    fn from(expression: &Expression) -> Self {
        let kind = match expression {
            Expression::UnaryFunction(e) => ExpressionKindDescriptor::UnaryFunction {
                function: e.function().name(),
            },
            Expression::BinaryFunction(e) => ExpressionKindDescriptor::BinaryFunction {
                function: e.function().name(),
            },
            Expression::Add(_) => ExpressionKindDescriptor::Add,
            Expression::Subtract(_) => ExpressionKindDescriptor::Subtract,
            Expression::Dot(_) => ExpressionKindDescriptor::Dot,
            Expression::Multiply(_) => ExpressionKindDescriptor::Multiply,
            Expression::Divide(_) => ExpressionKindDescriptor::Divide,
        };
        Self {
            id: expression.id().0,
            kind,
            arg1: expression.arg1().0,
            arg2: expression.arg2().map(|NodeId(id)| id),
            result: expression.result().0,
        }
    }
}

impl Procedure {
    /// 生成本过程的结构描述
    pub fn describe(&self) -> ProcedureDescriptor {
        ProcedureDescriptor {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: self.name.clone(),
            input: self.input.0,
            output: self.output.0,
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeDescriptor {
                    id: node.id().0,
                    shape: node.shape().to_vec(),
                    constant: node.is_constant(),
                    provenance: node.provenance(),
                })
                .collect(),
            expressions: self.forward.iter().map(ExpressionDescriptor::from).collect(),
            backward: self.backward.iter().map(|e| e.id().0).collect(),
            links: self
                .links
                .iter()
                .map(|link| LinkDescriptor {
                    producer: link.producer().0,
                    consumer: link.consumer().0,
                })
                .collect(),
        }
    }
}
