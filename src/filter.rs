//! Filter 树的数据模型, 以及请求体 JSON 到类型化树的边界转换

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::CompileError;

/// Filter 树的节点, 叶子为单个字段条件, And/Or 为组合节点
///
/// 线上格式为嵌套 JSON 对象: 叶子带 `field`/`op`/`value` 键,
/// 组合节点带 `and` 或 `or` 键 (子节点数组)
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// 单个字段的过滤条件, 例如: `{"field":"Brand","op":"eq","value":"BMW"}`
    Leaf {
        field: String,
        op: String,
        value: Option<Scalar>,
    },
    /// 逻辑与运算 (AND), 子节点有序
    And(Vec<FilterNode>),
    /// 逻辑或运算 (OR), 子节点有序
    Or(Vec<FilterNode>),
}

/// 叶子节点的字面量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Scalar {
    /// 从 JSON 值构建字面量, 仅接受字符串/数字/布尔
    pub fn from_value(value: &Value) -> Result<Scalar, CompileError> {
        match value {
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(Scalar::Float(x))
                } else {
                    Err(CompileError::invalid_structure(format!(
                        "filter value {} is out of range",
                        n
                    )))
                }
            }
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            other => Err(CompileError::invalid_structure(format!(
                "filter value must be a string, number, or boolean, got {}",
                other
            ))),
        }
    }
}

impl FilterNode {
    /// 从 JSON 字符串构建 Filter 树
    pub fn from_json(json: &str) -> Result<FilterNode, CompileError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CompileError::invalid_structure(format!("invalid filter JSON: {}", e)))?;
        FilterNode::from_value(&value)
    }

    /// 从请求体的 JSON 值构建类型化的 Filter 树
    ///
    /// 同时携带组合键和叶子键的节点, 以及两者都没有的节点,
    /// 都视为结构错误而不是静默忽略
    pub fn from_value(value: &Value) -> Result<FilterNode, CompileError> {
        let map = value.as_object().ok_or_else(|| {
            CompileError::invalid_structure("filter node must be a JSON object")
        })?;

        let has_leaf_keys =
            map.contains_key("field") || map.contains_key("op") || map.contains_key("value");

        match (map.get("and"), map.get("or"), has_leaf_keys) {
            (Some(children), None, false) => Ok(FilterNode::And(Self::children_from(children)?)),
            (None, Some(children), false) => Ok(FilterNode::Or(Self::children_from(children)?)),
            (None, None, true) => {
                let field = map.get("field").and_then(Value::as_str).ok_or_else(|| {
                    CompileError::invalid_structure("leaf node requires a string `field`")
                })?;
                let op = map.get("op").and_then(Value::as_str).ok_or_else(|| {
                    CompileError::invalid_structure("leaf node requires a string `op`")
                })?;
                // null 与缺失同义: 无值运算符会忽略, 带值运算符会在编译时报错
                let value = match map.get("value") {
                    None | Some(Value::Null) => None,
                    Some(v) => Some(Scalar::from_value(v)?),
                };
                Ok(FilterNode::Leaf {
                    field: field.to_string(),
                    op: op.to_string(),
                    value,
                })
            }
            _ => Err(CompileError::invalid_structure(
                "node mixes combinator and leaf keys, or has neither",
            )),
        }
    }

    fn children_from(value: &Value) -> Result<Vec<FilterNode>, CompileError> {
        let items = value.as_array().ok_or_else(|| {
            CompileError::invalid_structure("combinator children must be an array")
        })?;
        items.iter().map(FilterNode::from_value).collect()
    }
}

/// 固定的运算符表, 对应过滤协议中的 `op` 编码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    /// 协议支持的全部运算符编码
    pub const CODES: [&'static str; 11] = [
        "eq",
        "ne",
        "l",
        "le",
        "g",
        "ge",
        "contains",
        "startsWith",
        "endsWith",
        "isEmpty",
        "isNotEmpty",
    ];

    /// 根据协议编码查找运算符, 表外编码返回 None
    pub fn from_code(code: &str) -> Option<Operator> {
        match code {
            "eq" => Some(Operator::Eq),
            "ne" => Some(Operator::Ne),
            "l" => Some(Operator::Lt),
            "le" => Some(Operator::Le),
            "g" => Some(Operator::Gt),
            "ge" => Some(Operator::Ge),
            "contains" => Some(Operator::Contains),
            "startsWith" => Some(Operator::StartsWith),
            "endsWith" => Some(Operator::EndsWith),
            "isEmpty" => Some(Operator::IsEmpty),
            "isNotEmpty" => Some(Operator::IsNotEmpty),
            _ => None,
        }
    }

    /// 该运算符是否需要比较值
    pub fn requires_value(&self) -> bool {
        !matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_from_value() {
        let node = FilterNode::from_value(&json!({"field": "Brand", "op": "eq", "value": "BMW"}))
            .unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf {
                field: "Brand".to_string(),
                op: "eq".to_string(),
                value: Some(Scalar::Text("BMW".to_string())),
            }
        );
    }

    #[test]
    fn test_nested_combinators_from_value() {
        let node = FilterNode::from_value(&json!({
            "and": [
                {"or": [
                    {"field": "Seats", "op": "ge", "value": 4},
                    {"field": "Seats", "op": "eq", "value": 2},
                ]},
                {"field": "RapidCharge", "op": "eq", "value": true},
            ]
        }))
        .unwrap();

        match node {
            FilterNode::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], FilterNode::Or(_)));
                assert!(matches!(
                    children[1],
                    FilterNode::Leaf {
                        value: Some(Scalar::Bool(true)),
                        ..
                    }
                ));
            }
            other => panic!("expected And node, got {:?}", other),
        }
    }

    #[test]
    fn test_value_types() {
        let int = FilterNode::from_value(&json!({"field": "a", "op": "eq", "value": 30})).unwrap();
        assert!(matches!(
            int,
            FilterNode::Leaf {
                value: Some(Scalar::Int(30)),
                ..
            }
        ));

        let float =
            FilterNode::from_value(&json!({"field": "a", "op": "eq", "value": 4.6})).unwrap();
        assert!(matches!(
            float,
            FilterNode::Leaf {
                value: Some(Scalar::Float(_)),
                ..
            }
        ));

        let null =
            FilterNode::from_value(&json!({"field": "a", "op": "isEmpty", "value": null})).unwrap();
        assert!(matches!(null, FilterNode::Leaf { value: None, .. }));
    }

    #[test]
    fn test_mixed_keys_rejected() {
        let err = FilterNode::from_value(&json!({
            "field": "Brand", "op": "eq", "value": "BMW", "and": []
        }))
        .unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));

        let err = FilterNode::from_value(&json!({"and": [], "or": []})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_empty_object_rejected() {
        let err = FilterNode::from_value(&json!({})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = FilterNode::from_value(&json!(42)).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));

        let err = FilterNode::from_value(&json!([{"field": "a", "op": "eq", "value": 1}]))
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_combinator_children_must_be_array() {
        let err = FilterNode::from_value(&json!({"and": "not-an-array"})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_leaf_missing_op_rejected() {
        let err = FilterNode::from_value(&json!({"field": "Brand", "value": "BMW"})).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_object_value_rejected() {
        let err = FilterNode::from_value(&json!({
            "field": "Brand", "op": "eq", "value": {"nested": true}
        }))
        .unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_from_json_rejects_invalid_json() {
        let err = FilterNode::from_json("not json").unwrap_err();
        assert!(matches!(err, CompileError::InvalidFilterStructure(_)));
    }

    #[test]
    fn test_every_code_maps_to_an_operator() {
        for code in Operator::CODES {
            assert!(Operator::from_code(code).is_some(), "missing code {}", code);
        }
        assert_eq!(Operator::from_code("like"), None);
    }

    #[test]
    fn test_requires_value() {
        assert!(Operator::Eq.requires_value());
        assert!(Operator::Contains.requires_value());
        assert!(!Operator::IsEmpty.requires_value());
        assert!(!Operator::IsNotEmpty.requires_value());
    }
}
