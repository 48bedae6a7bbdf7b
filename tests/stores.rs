#[path = "common/mod.rs"]
mod common;

use common::*;
use redata::{Comment, CommentStore, IngestError, MemoryStore, PairLimit, ReplacePolicy, SqliteStore, Timestamp};

fn comment(id: &str, parent: &str, score: i64) -> Comment {
    Comment {
        comment_id: id.into(),
        parent_id: parent.into(),
        created_utc: Timestamp::Int(1136074600),
        score,
        subreddit: "programming".into(),
        controversiality: 1,
        body: format!("body of {id}"),
        parent_body: None,
    }
}

/// Behavior every backend must share.
fn exercise_store_contract<S: CommentStore>(store: &mut S) {
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.find_by_key("a").unwrap().is_none());
    assert!(store.find_best_above("p1", i64::MIN).unwrap().is_none());

    store.insert(&comment("a", "p1", 4)).unwrap();
    store.insert(&comment("b", "p1", 9)).unwrap();
    store.insert(&comment("c", "p1", 9)).unwrap();
    store.insert(&comment("d", "p2", 100)).unwrap();
    let mut linked = comment("e", "p1", -3);
    linked.parent_body = Some("parent text".into());
    linked.created_utc = Timestamp::Float(1136074600.25);
    store.insert(&linked).unwrap();
    assert_eq!(store.count().unwrap(), 5);

    // Round-trips every field, including optional parent body and float timestamps.
    assert_eq!(store.find_by_key("e").unwrap(), Some(linked.clone()));

    // Strictly greater, best first, ties go to the earlier insert.
    assert_eq!(store.find_best_above("p1", 0).unwrap().unwrap().comment_id, "b");
    assert_eq!(store.find_best_above("p1", 8).unwrap().unwrap().comment_id, "b");
    assert!(store.find_best_above("p1", 9).unwrap().is_none());
    assert_eq!(store.find_best_above("p1", -10).unwrap().unwrap().score, 9);
    assert_eq!(store.find_best_above("p2", 0).unwrap().unwrap().comment_id, "d");

    let kids: Vec<String> = store.find_by_parent("p1").unwrap().into_iter().map(|c| c.comment_id).collect();
    assert_eq!(kids, vec!["b", "c", "a", "e"]);

    // Replacement is a full overwrite keyed by the old id.
    assert!(store.replace("a", &comment("z", "p1", 12)).unwrap());
    assert!(store.find_by_key("a").unwrap().is_none());
    assert_eq!(store.find_by_key("z").unwrap().unwrap().score, 12);
    assert_eq!(store.find_best_above("p1", 0).unwrap().unwrap().comment_id, "z");
    assert_eq!(store.count().unwrap(), 5);
    assert!(!store.replace("missing", &comment("y", "p1", 1)).unwrap());

    // Duplicate ids are allowed; lookups and replacement hit the first one.
    let mut dup = comment("d", "p3", 1);
    dup.body = "second d".into();
    store.insert(&dup).unwrap();
    assert_eq!(store.find_by_key("d").unwrap().unwrap().parent_id, "p2");
    assert!(store.replace("d", &comment("d", "p2", 101)).unwrap());
    assert_eq!(store.find_by_parent("p3").unwrap().len(), 1);
    assert_eq!(store.find_by_parent("p2").unwrap()[0].score, 101);

    store.clear_all().unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.find_by_key("z").unwrap().is_none());
}

#[test]
fn memory_store_contract() {
    exercise_store_contract(&mut MemoryStore::new());
}

#[test]
fn sqlite_store_contract() {
    exercise_store_contract(&mut SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_session_contract() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut session = store.session().unwrap();
    exercise_store_contract(&mut session);
    session.commit().unwrap();
}

/// Full run into an on-disk database: results are committed and survive reopening.
#[test]
fn sqlite_run_commits() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let input = dir.join("RC_2006-01.jsonl");
    write_jsonl(
        &input,
        &[
            comment_line("p1", "t3_s1", 10, "question\n\"why?\""),
            comment_line("c1", "t1_p1", 3, "meh"),
            comment_line("c2", "t1_p1", 7, "great"),
        ],
    );
    let db = dir.join("reddit.sqlite");

    let mut store = SqliteStore::open(&db).unwrap();
    let report = ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded)
        .run_sqlite(&input, &mut store)
        .unwrap();
    assert_eq!(report.stats.inserted, 3);
    assert_eq!(report.stats.linked_pairs, 2);
    drop(store);

    let reopened = SqliteStore::open(&db).unwrap();
    assert_eq!(reopened.count().unwrap(), 2);
    let best = reopened.find_best_above("p1", i64::MIN).unwrap().unwrap();
    assert_eq!(best.comment_id, "c2");
    assert_eq!(best.parent_body.as_deref(), Some("question nowaliniaigora 'why?'"));
}

/// A failure mid-run rolls back everything, including the initial reset.
#[test]
fn sqlite_run_rolls_back_on_error() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let db = dir.join("reddit.sqlite");
    let good = dir.join("good.jsonl");
    write_jsonl(&good, &[comment_line("keep", "t3_s1", 5, "kept from first run")]);

    let mut store = SqliteStore::open(&db).unwrap();
    ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded)
        .run_sqlite(&good, &mut store)
        .unwrap();
    assert_eq!(store.count().unwrap(), 1);

    let bad = dir.join("bad.jsonl");
    write_jsonl(
        &bad,
        &[comment_line("new1", "t3_s2", 5, "would be stored"), "not json at all".to_string()],
    );
    let err = ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded)
        .run_sqlite(&bad, &mut store)
        .unwrap_err();
    assert!(matches!(err, IngestError::MalformedInput { line_no: 2, .. }));

    assert_eq!(store.count().unwrap(), 1);
    assert!(store.find_by_key("keep").unwrap().is_some());
    assert!(store.find_by_key("new1").unwrap().is_none());
}

/// Without a reset, a new run links replies to comments stored by earlier runs.
#[test]
fn keep_existing_links_across_runs() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let db = dir.join("reddit.sqlite");
    let first = dir.join("first.jsonl");
    let second = dir.join("second.jsonl");
    write_jsonl(&first, &[comment_line("p1", "t3_s1", 5, "parent")]);
    write_jsonl(&second, &[comment_line("c1", "t1_p1", 5, "child")]);

    let mut store = SqliteStore::open(&db).unwrap();
    ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded).run_sqlite(&first, &mut store).unwrap();
    let report = ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded)
        .reset_store(false)
        .run_sqlite(&second, &mut store)
        .unwrap();
    assert_eq!(report.stats.linked_pairs, 1);
    assert_eq!(store.count().unwrap(), 2);

    // Default runs clear what was there.
    ingestor(ReplacePolicy::BestOnly, PairLimit::Unbounded).run_sqlite(&second, &mut store).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn unopenable_database_is_unavailable() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let err = SqliteStore::open(dir.join("missing_dir").join("db.sqlite")).err().unwrap();
    assert!(matches!(err, redata::StoreError::Unavailable { .. }));
}
