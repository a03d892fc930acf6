//! CSV import: turns a data file into INSERT statements for seeding a table.

use std::path::Path;

use sea_query::{Alias, MysqlQueryBuilder, Query, SimpleExpr, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv file has no header row")]
    MissingHeader,
    #[error("failed to build insert statement: {0}")]
    Statement(#[from] sea_query::error::Error),
}

/// 读取 CSV 文件并为每条记录生成一条 INSERT 语句
///
/// 首行为列名; 单元格按原始种子脚本的规则归一化: 去掉尾部空白,
/// 数字和布尔转为对应类型, 空单元格写入 NULL
pub fn import_csv<P: AsRef<Path>>(path: P, table: &str) -> Result<Vec<String>, ImportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<Alias> = reader
        .headers()?
        .iter()
        .map(|header| Alias::new(header.trim()))
        .collect();
    if columns.is_empty() {
        return Err(ImportError::MissingHeader);
    }

    let mut statements = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: Vec<Value> = record.iter().map(cell_value).collect();

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(table))
            .columns(columns.clone())
            .values(values.into_iter().map(SimpleExpr::from))?;
        statements.push(insert.to_string(MysqlQueryBuilder));
    }

    Ok(statements)
}

/// 单元格类型推断: 整数优先于浮点, 其次布尔, 其余保持文本
fn cell_value(raw: &str) -> Value {
    let cell = raw.trim_end();
    if cell.is_empty() {
        return Value::String(None);
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::BigInt(Some(n));
    }
    if let Ok(x) = cell.parse::<f64>() {
        return Value::Double(Some(x));
    }
    match cell.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(Some(true)),
        "false" => Value::Bool(Some(false)),
        _ => Value::String(Some(Box::new(cell.to_string()))),
    }
}
