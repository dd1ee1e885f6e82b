use serde_json::json;
use sqlstencil::prelude::*;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 100;

fn catalog() -> Arc<ColumnCatalog> {
    Arc::new(
        ColumnCatalog::new(
            "events",
            vec![
                ColumnMetadata::new("Id", DataType::Int64),
                ColumnMetadata::new("Kind", DataType::String),
                ColumnMetadata::new("Payload", DataType::Json).nullable(true),
            ],
        )
        .unwrap(),
    )
}

#[test]
fn test_parallel_render_of_shared_template() {
    let ctx = PlaceholderContext::new(Dialect::Postgres, catalog());
    let template = Arc::new(
        prepare(
            "SELECT {{columns}} FROM {{table}}{{if notnull=kind}} WHERE kind = {{@kind}}{{/if}} {{limit --param n}}",
            &ctx,
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let template = Arc::clone(&template);
            thread::spawn(move || {
                let params: Params = json!({"kind": "click", "n": i + 1})
                    .as_object()
                    .cloned()
                    .unwrap();
                let sql = template.render(Some(&params)).unwrap().into_owned();
                (i, sql)
            })
        })
        .collect();

    for handle in handles {
        let (i, sql) = handle.join().unwrap();
        assert_eq!(
            sql,
            format!(
                "SELECT \"id\", \"kind\", \"payload\" FROM \"events\" WHERE kind = $kind LIMIT {}",
                i + 1
            )
        );
    }
}

#[test]
fn test_parallel_prepare_matches_serial() {
    let ctx = PlaceholderContext::new(Dialect::SqlServer, catalog());
    let texts: Vec<String> = (0..THREADS)
        .map(|i| format!("SELECT {{{{columns --exclude Payload}}}} FROM {{{{table}}}} WHERE id = {}", i))
        .collect();
    let expected: Vec<String> = texts
        .iter()
        .map(|t| prepare(t, &ctx).unwrap().sql().to_string())
        .collect();

    let handles: Vec<_> = texts
        .into_iter()
        .map(|text| {
            let ctx = ctx.clone();
            thread::spawn(move || prepare(&text, &ctx).unwrap().sql().to_string())
        })
        .collect();

    let actual: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_shared_cache_prepares_once_per_text() {
    let cache = Arc::new(TemplateCache::new(PlaceholderContext::new(
        Dialect::Sqlite,
        catalog(),
    )));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let text = if i % 2 == 0 {
                    "SELECT {{columns}} FROM {{table}}"
                } else {
                    "DELETE FROM {{table}} WHERE id = {{@id}}"
                };
                cache.get_or_prepare(text).unwrap()
            })
        })
        .collect();

    let prepared: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(cache.len(), 2);
    assert!(Arc::ptr_eq(&prepared[0], &prepared[2]));
    assert!(Arc::ptr_eq(&prepared[1], &prepared[3]));
}

#[test]
fn test_parallel_query_building() {
    let catalog = catalog();
    let handles: Vec<_> = (0..THREADS as i64)
        .map(|i| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                Queryable::table(Dialect::MySql, catalog)
                    .filter(member("Id").gt(i))
                    .to_sql_with_parameters()
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.join().unwrap();
        assert!(out.sql.ends_with("WHERE `id` > @p0"));
        assert_eq!(out.parameters[0].value, json!(i));
    }
}
