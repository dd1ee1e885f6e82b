use serde_json::json;
use sqlparser::dialect::{PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use sqlstencil::prelude::*;
use sqlstencil::QueryError;
use std::sync::Arc;

fn users() -> Arc<ColumnCatalog> {
    Arc::new(
        ColumnCatalog::new(
            "users",
            vec![
                ColumnMetadata::new("Id", DataType::Int64),
                ColumnMetadata::new("Name", DataType::String),
                ColumnMetadata::new("Email", DataType::String).nullable(true),
                ColumnMetadata::new("IsActive", DataType::Bool),
                ColumnMetadata::new("Age", DataType::Int32),
            ],
        )
        .unwrap(),
    )
}

fn orders() -> Arc<ColumnCatalog> {
    Arc::new(
        ColumnCatalog::new(
            "orders",
            vec![
                ColumnMetadata::new("Id", DataType::Int64),
                ColumnMetadata::new("UserId", DataType::Int64),
                ColumnMetadata::new("Total", DataType::Float64),
            ],
        )
        .unwrap(),
    )
}

const USER_COLUMNS: &str = "[id], [name], [email], [is_active], [age]";

#[test]
fn test_lists_columns_explicitly() {
    let sql = Queryable::table(Dialect::Sqlite, users()).to_sql().unwrap();
    assert_eq!(sql, format!("SELECT {USER_COLUMNS} FROM [users]"));
    assert!(!sql.contains('*'));
}

#[test]
fn test_clause_order() {
    let query = Queryable::table(Dialect::Sqlite, users())
        .filter(member("IsActive"))
        .order_by(member("Name"))
        .skip(20)
        .take(10);

    assert_eq!(
        query.to_sql().unwrap(),
        format!("SELECT {USER_COLUMNS} FROM [users] WHERE [is_active] = 1 ORDER BY [name] ASC LIMIT 10 OFFSET 20")
    );

    let mssql = Queryable::table(Dialect::SqlServer, users())
        .filter(member("IsActive"))
        .order_by(member("Name"))
        .skip(20)
        .take(10);
    assert!(mssql
        .to_sql()
        .unwrap()
        .ends_with("ORDER BY [name] ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"));
}

#[test]
fn test_sqlserver_paging_without_order() {
    let sql = Queryable::table(Dialect::SqlServer, users()).take(5).to_sql().unwrap();
    assert!(sql.ends_with("FROM [users] ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"));
}

#[test]
fn test_ordering_keys() {
    let sql = Queryable::table(Dialect::Sqlite, users())
        .order_by(member("Email"))
        .order_by(member("Name"))
        .then_by_descending(member("Age"))
        .to_sql()
        .unwrap();
    assert!(sql.ends_with("ORDER BY [name] ASC, [age] DESC"));
}

#[test]
fn test_parameterized_sql() {
    let query = Queryable::table(Dialect::Sqlite, users())
        .filter(member("Age").gt(18).and(member("Name").starts_with("Jo")))
        .filter(member("Email").ne(null()));

    let out = query.to_sql_with_parameters().unwrap();
    assert_eq!(
        out.sql,
        format!("SELECT {USER_COLUMNS} FROM [users] WHERE [age] > @p0 AND [name] LIKE @p1 || '%' AND [email] IS NOT NULL")
    );
    let params: Vec<_> = out.parameters.iter().map(|p| (p.name.as_str(), p.value.clone())).collect();
    assert_eq!(params, vec![("p0", json!(18)), ("p1", json!("Jo"))]);

    // literal mode inlines the same constants
    assert!(query
        .to_sql()
        .unwrap()
        .contains("WHERE [age] > 18 AND [name] LIKE 'Jo%'"));
}

#[test]
fn test_db2_parameters_are_positional() {
    let out = Queryable::table(Dialect::Db2, users())
        .filter(member("Name").eq("x").or(member("Age").lt(3)))
        .to_sql_with_parameters()
        .unwrap();
    assert!(out.sql.ends_with("WHERE \"name\" = ? OR \"age\" < ?"));
    assert_eq!(out.parameters.len(), 2);
    assert_eq!(out.parameters[1].name, "p1");
}

#[test]
fn test_join_aliases() {
    let sql = Queryable::table(Dialect::Postgres, users())
        .join(
            Queryable::table(Dialect::Postgres, orders()),
            member("Id"),
            member("UserId"),
        )
        .filter(member_of(1, "Total").gt(100))
        .select(project(vec![
            ("Name", member("Name")),
            ("Total", member_of(1, "Total")),
        ]))
        .to_sql()
        .unwrap();

    insta::assert_snapshot!(sql, @r#"SELECT "t1"."name", "t2"."total" FROM "users" AS "t1" INNER JOIN "orders" AS "t2" ON "t1"."id" = "t2"."user_id" WHERE "t2"."total" > 100"#);
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).unwrap();
}

#[test]
fn test_join_on_filtered_query_nests() {
    let sql = Queryable::table(Dialect::Sqlite, users())
        .join(
            Queryable::table(Dialect::Sqlite, orders()).filter(member("Total").gt(50)),
            member("Id"),
            member("UserId"),
        )
        .to_sql()
        .unwrap();

    insta::assert_snapshot!(sql, @"SELECT [t1].[id], [t1].[name], [t1].[email], [t1].[is_active], [t1].[age] FROM [users] AS [t1] INNER JOIN (SELECT [id], [user_id], [total] FROM [orders] WHERE [total] > 50) AS [t2] ON [t1].[id] = [t2].[user_id]");
    Parser::parse_sql(&SQLiteDialect {}, &sql).unwrap();
}

#[test]
fn test_oracle_untyped_join() {
    let sql = Queryable::untyped(Dialect::Oracle, "accounts")
        .join(
            Queryable::untyped(Dialect::Oracle, "owners"),
            member("OwnerId"),
            member("Id"),
        )
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT \"t1\".* FROM \"accounts\" \"t1\" INNER JOIN \"owners\" \"t2\" ON \"t1\".\"owner_id\" = \"t2\".\"id\""
    );
}

#[test]
fn test_subquery_source() {
    let active = Queryable::table(Dialect::Sqlite, users()).filter(member("IsActive"));
    let sql = Queryable::from_query(active)
        .filter(member("Age").gte(21))
        .to_sql()
        .unwrap();

    assert_eq!(
        sql,
        format!("SELECT {USER_COLUMNS} FROM (SELECT {USER_COLUMNS} FROM [users] WHERE [is_active] = 1) AS [sq] WHERE [age] >= 21")
    );
    Parser::parse_sql(&SQLiteDialect {}, &sql).unwrap();
}

#[test]
fn test_distinct_projection() {
    let sql = Queryable::table(Dialect::Sqlite, users())
        .select(member("Email"))
        .distinct()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT DISTINCT [email] FROM [users]");

    let sql = Queryable::table(Dialect::Sqlite, users())
        .select(member("Name"))
        .take(3)
        .distinct()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT DISTINCT [name] FROM (SELECT [name] FROM [users] LIMIT 3) AS [sq]"
    );
}

#[test]
fn test_projection_then_filter_uses_aliases() {
    let sql = Queryable::table(Dialect::Sqlite, users())
        .select(project(vec![
            ("Name", member("Name")),
            ("NextAge", member("Age").add(1)),
        ]))
        .filter(member("NextAge").gt(30))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT [name], [NextAge] FROM (SELECT [name], [age] + 1 AS [NextAge] FROM [users]) AS [sq] WHERE [NextAge] > 30"
    );
}

#[test]
fn test_group_by_with_aggregates() {
    let sql = Queryable::table(Dialect::MySql, users())
        .group_by(member("IsActive"))
        .select(project(vec![
            ("Active", group_key()),
            ("Count", count()),
            ("AvgAge", avg(member("Age"))),
        ]))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `is_active` AS `Active`, COUNT(*) AS `Count`, AVG(`age`) AS `AvgAge` FROM `users` GROUP BY `is_active`"
    );
}

#[test]
fn test_composite_group_key() {
    let sql = Queryable::table(Dialect::Postgres, orders())
        .group_by(project(vec![("User", member("UserId")), ("Order", member("Id"))]))
        .select(project(vec![
            ("User", group_key_field("User")),
            ("Sum", sum(member("Total"))),
        ]))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT \"user_id\" AS \"User\", SUM(\"total\") AS \"Sum\" FROM \"orders\" GROUP BY \"user_id\", \"id\""
    );
}

#[test]
fn test_pagination_composes() {
    let sql = Queryable::table(Dialect::Postgres, users())
        .take(10)
        .skip(3)
        .take(20)
        .to_sql()
        .unwrap();
    assert!(sql.ends_with("LIMIT 7 OFFSET 3"));
}

#[test]
fn test_enumeration_fails_fast() {
    let err = Queryable::table(Dialect::Sqlite, users())
        .to_list::<String>()
        .unwrap_err();
    assert_eq!(err, QueryError::ExecutionNotSupported);
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn test_translation_errors_surface() {
    let err = Queryable::table(Dialect::Sqlite, users())
        .filter(member("Age").gt(f64::INFINITY))
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, QueryError::Translate(_)));
}
