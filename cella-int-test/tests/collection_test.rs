//! Collection operations against a file-backed store.

use cella::collection::{Document, Index};
use cella::doc;
use cella::errors::ErrorKind;
use cella::filter::{field, gt, lt, QuerySpec};
use cella_int_test::test_util::{cleanup, create_test_context, run_test};
use serde_json::json;

#[ctor::ctor]
fn init() {
    colog::init();
}

fn ids(documents: &[Document]) -> Vec<Index> {
    documents.iter().filter_map(Document::id).collect()
}

fn insert_students(collection: &cella::collection::Collection) -> cella::errors::CellaResult<()> {
    collection.insert_with_id(doc! { "age": 10, "school": "randomSchool", "sex": "M" }, 1)?;
    collection.insert_with_id(doc! { "age": 22, "school": "randomUni", "sex": "M" }, 2)?;
    collection.insert_with_id(doc! { "age": 24, "school": "randomUni", "sex": "F" }, 3)?;
    Ok(())
}

#[test]
fn test_student_scenario() {
    run_test(
        create_test_context,
        |ctx| {
            let test = ctx.store().collection("test")?;
            insert_students(&test)?;

            let result = test.query(QuerySpec::new().field("age", gt(10)));
            assert_eq!(ids(&result), vec![Index::Int(2), Index::Int(3)]);

            let result = test.query(QuerySpec::new().field("age", gt(10)).field("sex", "F"));
            assert_eq!(ids(&result), vec![Index::Int(3)]);

            let result = test.query(
                QuerySpec::new()
                    .field("age", lt(24))
                    .field("sex", "M")
                    .field("school", "randomSchool"),
            );
            assert_eq!(ids(&result), vec![Index::Int(1)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_returns_inserted_document() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.store().collection("users")?;
            for i in 0..20 {
                users.insert_with_id(doc! { "n": i }, format!("user-{}", i))?;
            }
            for i in 0..20 {
                let found = users.get(format!("user-{}", i)).expect("inserted document");
                assert_eq!(found.get("n"), Some(&json!(i)));
            }
            assert!(users.get("user-99").is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_insert_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.store().collection("users")?;
            users.insert_with_id(doc! { "v": 1 }, 1)?;
            let err = users.insert_with_id(doc! { "v": 2 }, 1).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InsertionError);

            let reopened = ctx.reopen()?;
            let users = reopened.collection("users")?;
            assert_eq!(users.count(), 1);
            assert_eq!(users.get(1).unwrap().get("v"), Some(&json!(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_query_empty_and_literal() {
    run_test(
        create_test_context,
        |ctx| {
            let test = ctx.store().collection("test")?;
            insert_students(&test)?;

            assert_eq!(test.query(QuerySpec::new()).len(), 3);
            let uni = test.query(QuerySpec::new().field("school", "randomUni"));
            assert_eq!(ids(&uni), vec![Index::Int(2), Index::Int(3)]);
            assert!(test.query(QuerySpec::new().field("school", "none")).is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_builder() {
    run_test(
        create_test_context,
        |ctx| {
            let test = ctx.store().collection("test")?;
            insert_students(&test)?;

            let removed = test
                .delete(QuerySpec::new().field("sex", "M"))
                .and(QuerySpec::new().field("age", gt(15)))
                .execute()?;
            assert_eq!(removed, 1);
            assert!(test.get(2).is_none());
            assert_eq!(ids(&test.all()), vec![Index::Int(1), Index::Int(3)]);

            let reopened = ctx.reopen()?;
            assert!(reopened.collection("test")?.get(2).is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_builder_persists_merge() {
    run_test(
        create_test_context,
        |ctx| {
            let test = ctx.store().collection("test")?;
            insert_students(&test)?;

            let updated = test
                .update(QuerySpec::new().field("school", "randomUni"), doc! { "graduated": true })
                .execute()?;
            assert_eq!(updated, 2);

            let reopened = ctx.reopen()?;
            let test = reopened.collection("test")?;
            assert_eq!(test.get(3).unwrap().get("graduated"), Some(&json!(true)));
            assert_eq!(test.get(3).unwrap().get("age"), Some(&json!(24)));
            assert_eq!(test.get(1).unwrap().get("graduated"), None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_fluent_or_query() {
    run_test(
        create_test_context,
        |ctx| {
            let test = ctx.store().collection("test")?;
            insert_students(&test)?;

            let result = test.query(field("age").lt(11).or(field("sex").eq("F")));
            assert_eq!(ids(&result), vec![Index::Int(1), Index::Int(3)]);

            let projected = test
                .find(QuerySpec::new().field("sex", "F"))
                .project(&["age"])
                .execute();
            assert_eq!(projected, vec![doc! { "_id": 3, "age": 24 }]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_generated_ids_are_unique() {
    run_test(
        create_test_context,
        |ctx| {
            let notes = ctx.store().collection("notes")?;
            let ids = notes.insert_many((0..50).map(|i| doc! { "n": i }).collect())?;
            let unique: std::collections::HashSet<_> = ids.iter().cloned().collect();
            assert_eq!(unique.len(), 50);
            assert_eq!(notes.count(), 50);
            Ok(())
        },
        cleanup,
    )
}
