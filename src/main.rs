use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use table_browser::compiler::FilterCompiler;
use table_browser::filter::{FilterNode, Operator};
use table_browser::schema::SchemaCatalog;
use table_browser::statement;

/// 加载 schema 目录, 优先使用JSON文件, 失败时使用内置目录
fn load_catalog() -> SchemaCatalog {
    match SchemaCatalog::from_json_file("schema.json") {
        Ok(catalog) => {
            println!("✅ 成功从 schema.json 加载表结构");
            catalog
        }
        Err(e) => {
            println!("⚠️ 无法加载 schema.json ({}), 使用内置目录", e);
            SchemaCatalog::default()
        }
    }
}

fn main() -> Result<()> {
    println!("--- Table Browser: Filter 到 SQL 编译器 ---");

    // 显示当前的表结构目录
    let catalog = load_catalog();
    println!("\n[表结构]:");
    for table in catalog.table_names() {
        println!("  {} ({} 列)", table, catalog.columns(table).len());
        for column in catalog.columns(table) {
            println!("    {} {}", column.name, column.data_type);
        }
    }

    println!("\n[支持的运算符]:");
    for code in Operator::CODES {
        if let Some(op) = Operator::from_code(code) {
            let hint = if op.requires_value() { "需要值" } else { "无需值" };
            println!("  {:<12} {}", code, hint);
        }
    }

    // 1. 示例 filter
    let filter_json = r#"{"and":[{"field":"Range_Km","op":"ge","value":400},{"field":"Brand","op":"contains","value":"BMW"}]}"#;
    println!("\n[输入 Filter]:\n{}", filter_json);

    // 2. 边界转换 - JSON 到类型化的 Filter 树
    println!("\n[步骤 1]: 解析 JSON 为 Filter 树...");
    let tree = FilterNode::from_json(filter_json)?;
    println!("✓ 成功解析为 Filter 树");
    println!("树结构: {:#?}", tree);

    // 3. 编译 - Filter 树到 WHERE 子句
    println!("\n[步骤 2]: 编译为限制子句...");
    let compiler = FilterCompiler::new();
    let clause = compiler.compile(Some(&tree))?;
    println!("✓ 子句: {}", clause);

    // 4. 组装完整的查询语句
    println!("\n[步骤 3]: 组装完整查询...");
    println!("{}", statement::select_where("cars", &clause));
    println!("{}", statement::count_where("cars", &clause));

    repl(&compiler)
}

/// 交互模式: 逐行输入JSON filter, 输出编译后的查询
fn repl(compiler: &FilterCompiler) -> Result<()> {
    println!("\n--- 交互模式 (输入JSON filter, Ctrl-D 退出) ---");
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("filter> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match FilterNode::from_json(line)
                    .and_then(|tree| compiler.compile(Some(&tree)))
                {
                    Ok(clause) => println!("{}", statement::select_where("cars", &clause)),
                    Err(e) => println!("✗ 编译失败: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
