//! SQL statement assembly for the query executor.
//!
//! The compiler hands over a bare restriction clause; this module splices it
//! into full browse statements. Table identifiers go through sea-query
//! identifier quoting and never through the value-escaping path.

use sea_query::{Alias, Asterisk, Expr, Func, MysqlQueryBuilder, Query};

/// `SELECT * FROM table` with no restriction.
pub fn select_all(table: &str) -> String {
    let mut select = Query::select();
    select.column(Asterisk).from(Alias::new(table));
    select.to_string(MysqlQueryBuilder)
}

/// Filtered select. An empty clause means no restriction and the WHERE
/// keyword is omitted entirely.
pub fn select_where(table: &str, clause: &str) -> String {
    let mut select = Query::select();
    select.column(Asterisk).from(Alias::new(table));
    if !clause.is_empty() {
        select.and_where(Expr::cust(clause));
    }
    select.to_string(MysqlQueryBuilder)
}

/// Detail view: fetch a single record by its id column.
pub fn select_by_id(table: &str, id: i64) -> String {
    let mut select = Query::select();
    select
        .column(Asterisk)
        .from(Alias::new(table))
        .and_where(Expr::col(Alias::new("id")).eq(id));
    select.to_string(MysqlQueryBuilder)
}

/// Delete a single record by its id column.
pub fn delete_by_id(table: &str, id: i64) -> String {
    let mut delete = Query::delete();
    delete
        .from_table(Alias::new(table))
        .and_where(Expr::col(Alias::new("id")).eq(id));
    delete.to_string(MysqlQueryBuilder)
}

/// Row count under a restriction, for filter summaries.
pub fn count_where(table: &str, clause: &str) -> String {
    let mut select = Query::select();
    select
        .expr(Func::count(Expr::col(Asterisk)))
        .from(Alias::new(table));
    if !clause.is_empty() {
        select.and_where(Expr::cust(clause));
    }
    select.to_string(MysqlQueryBuilder)
}
