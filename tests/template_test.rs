use serde_json::json;
use sqlparser::dialect::{MsSqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use sqlstencil::catalog::{ColumnCatalog, ColumnMetadata};
use sqlstencil::sql::types::DataType;
use sqlstencil::sql::Dialect;
use sqlstencil::template::{prepare, Params, PlaceholderContext, TemplateCache, TemplateError};
use std::sync::Arc;

fn items(dialect: Dialect) -> PlaceholderContext {
    let catalog = ColumnCatalog::new(
        "items",
        vec![
            ColumnMetadata::new("Id", DataType::Int64),
            ColumnMetadata::new("Name", DataType::String),
            ColumnMetadata::new("Status", DataType::String).nullable(true),
            ColumnMetadata::new("Version", DataType::Int32),
        ],
    )
    .unwrap();
    PlaceholderContext::new(dialect, Arc::new(catalog))
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

fn balanced(sql: &str) -> bool {
    sql.matches('(').count() == sql.matches(')').count() && !sql.contains(",,")
}

#[test]
fn test_select_all_columns() {
    let tpl = prepare("SELECT {{columns}} FROM {{table}}", &items(Dialect::Sqlite)).unwrap();
    assert_eq!(tpl.sql(), "SELECT [id], [name], [status], [version] FROM [items]");
    assert!(!tpl.has_dynamic_placeholders());
    assert_eq!(tpl.render(None).unwrap(), tpl.sql());
    assert_eq!(tpl.render(Some(&params(json!({"x": 1})))).unwrap(), tpl.sql());
}

#[test]
fn test_quoting_per_dialect() {
    let expected = [
        (Dialect::Sqlite, "[id], [name]"),
        (Dialect::MySql, "`id`, `name`"),
        (Dialect::SqlServer, "[id], [name]"),
        (Dialect::Postgres, "\"id\", \"name\""),
        (Dialect::Oracle, "\"id\", \"name\""),
        (Dialect::Db2, "\"id\", \"name\""),
    ];
    for (dialect, columns) in expected {
        let tpl = prepare("{{columns --exclude Status,Version}}", &items(dialect)).unwrap();
        assert_eq!(tpl.sql(), columns, "{dialect}");
    }
}

#[test]
fn test_update_with_inline_version() {
    let tpl = prepare(
        "UPDATE {{table}} SET {{set --exclude Id --inline Version=Version+1}} WHERE id=@id",
        &items(Dialect::Sqlite),
    )
    .unwrap();
    insta::assert_snapshot!(tpl.sql(), @"UPDATE [items] SET [name] = @name, [status] = @status, [version] = [version]+1 WHERE id=@id");
    assert!(!tpl.sql().contains("[id] ="));
    assert_eq!(tpl.parameter_names(), ["name", "status"]);
}

#[test]
fn test_insert_values() {
    let tpl = prepare(
        "INSERT INTO {{table}} ({{columns --exclude Id}}) VALUES ({{values --exclude Id --inline Status='new',Name=COALESCE(Name, 'x')}})",
        &items(Dialect::Oracle),
    )
    .unwrap();
    insta::assert_snapshot!(tpl.sql(), @r#"INSERT INTO "items" ("name", "status", "version") VALUES (COALESCE("name", 'x'), 'new', :version)"#);
    assert!(balanced(tpl.sql()));
}

#[test]
fn test_db2_values_are_positional() {
    let tpl = prepare(
        "INSERT INTO {{table}} ({{columns}}) VALUES ({{values}})",
        &items(Dialect::Db2),
    )
    .unwrap();
    assert!(tpl.sql().ends_with("VALUES (?, ?, ?, ?)"));
}

#[test]
fn test_soft_conditions() {
    // every column excluded leaves an empty fragment
    let tpl = prepare(
        "UPDATE {{table}} SET {{set --exclude Id,Name,Status,Version}} WHERE id = 1",
        &items(Dialect::Sqlite),
    )
    .unwrap();
    assert_eq!(tpl.sql(), "UPDATE [items] SET  WHERE id = 1");

    // unknown inline targets are dropped
    let tpl = prepare(
        "{{set --exclude Id,Name,Status --inline Missing=1}}",
        &items(Dialect::Sqlite),
    )
    .unwrap();
    assert_eq!(tpl.sql(), "[version] = @version");
}

#[test]
fn test_limit_scenario() {
    let tpl = prepare(
        "SELECT {{columns}} FROM {{table}} {{limit --param n}}",
        &items(Dialect::Sqlite),
    )
    .unwrap();
    assert!(tpl.render(Some(&params(json!({"n": 10})))).unwrap().contains("LIMIT 10"));
    assert!(!tpl.render(Some(&params(json!({"n": null})))).unwrap().contains("LIMIT"));
    assert!(!tpl.render(None).unwrap().contains("LIMIT"));
}

#[test]
fn test_paged_query_validates_per_dialect() {
    let text = "SELECT {{columns}} FROM {{table}} ORDER BY id {{limit --param take}} {{offset --param skip}}";
    let p = params(json!({"skip": 20, "take": 10}));

    let sqlite_tpl = prepare(text, &items(Dialect::Sqlite)).unwrap();

    let sqlite = sqlite_tpl.render(Some(&p)).unwrap();
    assert!(sqlite.ends_with("ORDER BY id LIMIT 10 OFFSET 20"));
    Parser::parse_sql(&SQLiteDialect {}, &sqlite).unwrap();

    let pg_tpl = prepare(text, &items(Dialect::Postgres)).unwrap();

    let pg = pg_tpl.render(Some(&p)).unwrap();
    assert!(pg.ends_with("ORDER BY id LIMIT 10 OFFSET 20"));
    Parser::parse_sql(&PostgreSqlDialect {}, &pg).unwrap();

    // the first site carries the whole OFFSET/FETCH clause
    let mssql_tpl = prepare(text, &items(Dialect::SqlServer)).unwrap();
    let mssql = mssql_tpl.render(Some(&p)).unwrap();
    assert_eq!(
        mssql.trim_end(),
        "SELECT [id], [name], [status], [version] FROM [items] ORDER BY id OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    Parser::parse_sql(&MsSqlDialect {}, mssql.trim_end()).unwrap();
}

#[test]
fn test_pagination_follows_active_blocks() {
    let text = "SELECT * FROM {{table}}{{if notnull=paged}} {{limit --param n}}{{/if}} {{offset --param m}}";
    let p = params(json!({"n": 10, "m": 5}));

    let sqlite_tpl = prepare(text, &items(Dialect::Sqlite)).unwrap();

    let sqlite = sqlite_tpl.render(Some(&p)).unwrap();
    assert_eq!(sqlite, "SELECT * FROM [items] LIMIT -1 OFFSET 5");
    Parser::parse_sql(&SQLiteDialect {}, &sqlite).unwrap();

    let mysql_tpl = prepare(text, &items(Dialect::MySql)).unwrap();

    let mysql = mysql_tpl.render(Some(&p)).unwrap();
    assert!(mysql.contains("LIMIT 18446744073709551615 OFFSET 5"), "{mysql}");

    let mssql_tpl = prepare(text, &items(Dialect::SqlServer)).unwrap();

    let mssql = mssql_tpl.render(Some(&p)).unwrap();
    assert!(!mssql.contains("FETCH"), "{mssql}");
}

#[test]
fn test_conditional_filters() {
    let tpl = prepare(
        "SELECT {{columns}} FROM {{table}} WHERE 1 = 1{{if notnull=name}} AND name = {{@name}}{{/if}}{{if notempty=status}} AND status = {{arg --param status --name s}}{{/if}}",
        &items(Dialect::Sqlite),
    )
    .unwrap();
    assert!(tpl.has_dynamic_placeholders());

    let all = tpl
        .render(Some(&params(json!({"name": "a", "status": "open"}))))
        .unwrap();
    assert!(all.ends_with("WHERE 1 = 1 AND name = @name AND status = @s"));
    Parser::parse_sql(&SQLiteDialect {}, &all).unwrap();

    let some = tpl
        .render(Some(&params(json!({"name": null, "status": ""}))))
        .unwrap();
    assert!(some.ends_with("WHERE 1 = 1"));
}

#[test]
fn test_where_placeholder() {
    let tpl = prepare(
        "SELECT {{columns --exclude Version}} FROM {{table}} WHERE {{where --param filter}}",
        &items(Dialect::Postgres),
    )
    .unwrap();
    let sql = tpl
        .render(Some(&params(json!({"filter": "\"status\" IS NULL"}))))
        .unwrap();
    assert_eq!(
        sql,
        "SELECT \"id\", \"name\", \"status\" FROM \"items\" WHERE \"status\" IS NULL"
    );
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).unwrap();
}

#[test]
fn test_prepare_errors() {
    let ctx = items(Dialect::Sqlite);

    assert!(matches!(
        prepare("SELECT {{colums}} FROM t", &ctx),
        Err(TemplateError::UnknownPlaceholder { keyword, offset: 7 }) if keyword == "colums"
    ));
    assert!(matches!(
        prepare("SELECT {{columns FROM t", &ctx),
        Err(TemplateError::Syntax { offset: 7, .. })
    ));
    assert!(matches!(
        prepare("SELECT 1{{/if}}", &ctx),
        Err(TemplateError::Syntax { .. })
    ));
    assert!(matches!(
        prepare("{{if notnull=a}}SELECT 1", &ctx),
        Err(TemplateError::Syntax { offset: 0, .. })
    ));
    assert!(matches!(
        prepare("{{limit}}", &ctx),
        Err(TemplateError::Syntax { .. })
    ));
}

#[test]
fn test_missing_arg_is_fatal() {
    let tpl = prepare("SELECT * FROM t WHERE id = {{@id}}", &items(Dialect::Sqlite)).unwrap();
    assert_eq!(
        tpl.render(None),
        Err(TemplateError::MissingParameter { name: "id".into() })
    );
    assert_eq!(
        tpl.render(Some(&params(json!({"id": 5})))).unwrap(),
        "SELECT * FROM t WHERE id = @id"
    );
}

#[test]
fn test_prepare_is_idempotent() {
    let ctx = items(Dialect::MySql);
    let text = "SELECT {{columns}} FROM {{table}} {{limit --param n}}";
    let a = prepare(text, &ctx).unwrap();
    let b = prepare(text, &ctx).unwrap();
    assert_eq!(a.sql(), b.sql());
    assert_eq!(a.has_dynamic_placeholders(), b.has_dynamic_placeholders());
    assert_eq!(a.original_text(), text);
}

#[test]
fn test_cache_shares_prepared_templates() {
    let cache = TemplateCache::new(items(Dialect::Sqlite));
    let a = cache.get_or_prepare("SELECT {{columns}} FROM {{table}}").unwrap();
    let b = cache.get_or_prepare("SELECT {{columns}} FROM {{table}}").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(cache.get_or_prepare("{{nope}}").is_err());
    assert_eq!(cache.len(), 1);
}
