//! Schema 目录模块, 负责加载表结构元数据
//!
//! 目录由外部的 schema 内省层产出 (原始实现来自 `SHOW TABLES` /
//! `SHOW COLUMNS`), 供展示层构建字段选择器; 编译器本身不会查询它

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Schema 目录错误
#[derive(Debug)]
pub struct SchemaError {
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema 错误: {}", self.message)
    }
}

impl std::error::Error for SchemaError {}

impl SchemaError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// 单个列的元数据, 对应列内省结果的名称与类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
}

/// 表名到列定义的目录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// 表名到列定义列表的映射
    #[serde(flatten)]
    pub tables: BTreeMap<String, Vec<ColumnDef>>,
}

impl SchemaCatalog {
    /// 从JSON文件加载 schema 目录
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(SchemaError::new(format!(
                "目录文件不存在: {}",
                path_ref.display()
            )));
        }

        let content = fs::read_to_string(path_ref).map_err(|e| {
            SchemaError::new(format!("无法读取目录文件 {}: {}", path_ref.display(), e))
        })?;

        let tables: BTreeMap<String, Vec<ColumnDef>> =
            serde_json::from_str(&content).map_err(|e| {
                SchemaError::new(format!("无法解析JSON目录文件 {}: {}", path_ref.display(), e))
            })?;

        Ok(SchemaCatalog { tables })
    }

    /// 所有表名
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// 某个表的列定义, 表不存在时返回空
    pub fn columns(&self, table: &str) -> &[ColumnDef] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 表中是否存在该列
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns(table).iter().any(|c| c.name == column)
    }

    /// 内置目录 (电动车示例表, 用于演示或fallback)
    pub fn default() -> Self {
        let cars = vec![
            col("id", "int"),
            col("Brand", "varchar(255)"),
            col("Model", "varchar(255)"),
            col("AccelSec", "double"),
            col("TopSpeed_KmH", "int"),
            col("Range_Km", "int"),
            col("Efficiency_WhKm", "double"),
            col("FastCharge_KmH", "int"),
            col("RapidCharge", "tinyint(1)"),
            col("PowerTrain", "varchar(255)"),
            col("PlugType", "varchar(255)"),
            col("BodyStyle", "varchar(255)"),
            col("Segment", "varchar(255)"),
            col("Seats", "int"),
            col("PriceEuro", "double"),
            col("Date", "date"),
        ];

        let mut tables = BTreeMap::new();
        tables.insert("cars".to_string(), cars);
        Self { tables }
    }
}

fn col(name: &str, data_type: &str) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        data_type: data_type.to_string(),
    }
}
