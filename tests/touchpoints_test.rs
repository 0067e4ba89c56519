mod helpers;

use helpers::{input, seed_touchpoints, test_store, touchpoint, touchpoints_on_disk};
use ohara::store::{StoreError, TouchpointFilter, TouchpointInput};

fn no_filter() -> TouchpointFilter {
    TouchpointFilter::default()
}

fn since(start: &str) -> TouchpointFilter {
    TouchpointFilter {
        start_date: Some(start.to_string()),
        ..Default::default()
    }
}

#[test]
fn create_then_list_round_trips() {
    let (_tmp, store) = test_store();

    let created = store.create_touchpoint(input("Reviewed the storage RFC")).unwrap();
    assert!(!created.id.is_empty());
    assert!(created.date.ends_with('Z'));
    assert!(ohara::store::touchpoints::parse_timestamp(&created.date).is_some());

    let listed = store.list_touchpoints(&no_filter()).unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(listed[0].description, "Reviewed the storage RFC");
    assert_eq!(listed[0].tags, vec!["go"]);
    assert_eq!(listed[0].people_involved, vec!["alice"]);
    assert_eq!(listed[0].url.as_deref(), Some("https://example.com/pr/1"));
}

#[test]
fn ids_are_unique_and_order_is_creation_order() {
    let (_tmp, store) = test_store();
    let a = store.create_touchpoint(input("first")).unwrap();
    let b = store.create_touchpoint(input("second")).unwrap();
    let c = store.create_touchpoint(input("third")).unwrap();
    assert_ne!(a.id, b.id);
    assert_ne!(b.id, c.id);

    let ids: Vec<String> = store
        .list_touchpoints(&no_filter())
        .unwrap()
        .into_iter()
        .map(|tp| tp.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[test]
fn markup_is_stripped_before_persisting() {
    let (_tmp, store) = test_store();
    let mut raw = input("<b>Shipped</b> the <script>alert(1)</script>release");
    raw.people_involved = Some(vec!["<i>bob</i>".into()]);
    raw.url = Some("<a href='x'>https://example.com</a>".into());

    let created = store.create_touchpoint(raw).unwrap();
    assert_eq!(created.description, "Shipped the release");
    assert_eq!(created.people_involved, vec!["bob"]);
    assert_eq!(created.url.as_deref(), Some("https://example.com"));

    let on_disk = touchpoints_on_disk(&store);
    assert_eq!(on_disk[0].description, "Shipped the release");
}

#[test]
fn nested_brackets_do_not_persist_markup() {
    let (_tmp, store) = test_store();
    let mut raw = input("ok <<b>img src=x onerror=alert(1)> done");
    raw.people_involved = Some(vec!["<<i>script>alert(1)<</i>/script>bob".into()]);
    store.create_touchpoint(raw).unwrap();
    store
        .create_touchpoint(input("ok <<b>script>alert(1)<</b>/script> done"))
        .unwrap();

    let err = store
        .create_touchpoint(input("<<b>img src=x onerror=alert(1)>"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let on_disk = touchpoints_on_disk(&store);
    assert_eq!(on_disk.len(), 2);
    for tp in &on_disk {
        for text in std::iter::once(&tp.description).chain(&tp.people_involved) {
            let opens_tag = text
                .as_bytes()
                .windows(2)
                .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || b"/!?".contains(&w[1])));
            assert!(!opens_tag, "persisted markup: {text:?}");
        }
    }
    assert_eq!(on_disk[0].description, "ok  done");
    assert_eq!(on_disk[0].people_involved, vec!["bob"]);
}

#[test]
fn absent_lists_become_empty() {
    let (_tmp, store) = test_store();
    let created = store
        .create_touchpoint(TouchpointInput {
            description: "Solo work".into(),
            category: "Knowledge Sharing".into(),
            ..Default::default()
        })
        .unwrap();
    assert!(created.tags.is_empty());
    assert!(created.people_involved.is_empty());
    assert_eq!(created.url, None);

    let raw = std::fs::read_to_string(store.data_dir().join("touchpoints.json")).unwrap();
    assert!(raw.contains("\"tags\": []"));
    assert!(raw.contains("\"people_involved\": []"));
}

#[test]
fn description_empty_after_sanitizing_is_rejected() {
    let (_tmp, store) = test_store();
    let err = store.create_touchpoint(input("<p>  </p>")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(touchpoints_on_disk(&store).is_empty());
}

#[test]
fn unknown_category_is_rejected_and_collection_unchanged() {
    let (_tmp, store) = test_store();
    store.create_touchpoint(input("existing")).unwrap();

    let mut bad = input("new");
    bad.category = "Not A Category".into();
    let err = store.create_touchpoint(bad).unwrap_err();

    match err {
        StoreError::Validation(msg) => assert!(msg.contains("Not A Category")),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.list_touchpoints(&no_filter()).unwrap().len(), 1);
}

#[test]
fn unknown_tag_is_rejected() {
    let (_tmp, store) = test_store();
    let mut bad = input("tagged");
    bad.tags = Some(vec!["go".into(), "cobol".into()]);
    let err = store.create_touchpoint(bad).unwrap_err();
    match err {
        StoreError::Validation(msg) => assert!(msg.contains("cobol")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn category_match_is_case_sensitive() {
    let (_tmp, store) = test_store();
    let mut bad = input("case");
    bad.category = "mentorship".into();
    assert!(matches!(
        store.create_touchpoint(bad),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn category_and_tag_filters() {
    let (_tmp, store) = test_store();
    seed_touchpoints(
        &store,
        &[
            touchpoint("a", "2024-01-01T00:00:00Z", "Mentorship", &["go"]),
            touchpoint("b", "2024-02-01T00:00:00Z", "Process improvement", &["go", "docker"]),
            touchpoint("c", "2024-03-01T00:00:00Z", "Mentorship", &["docker"]),
        ],
    );

    let ids = |filter: TouchpointFilter| -> Vec<String> {
        store
            .list_touchpoints(&filter)
            .unwrap()
            .into_iter()
            .map(|tp| tp.id)
            .collect()
    };

    assert_eq!(
        ids(TouchpointFilter {
            category: Some("Mentorship".into()),
            ..Default::default()
        }),
        vec!["a", "c"]
    );
    assert_eq!(
        ids(TouchpointFilter {
            tag: Some("docker".into()),
            ..Default::default()
        }),
        vec!["b", "c"]
    );
    assert_eq!(
        ids(TouchpointFilter {
            category: Some("Mentorship".into()),
            tag: Some("docker".into()),
            start_date: Some(String::new()),
        }),
        vec!["c"]
    );
}

#[test]
fn start_date_filter_keeps_records_on_or_after() {
    let (_tmp, store) = test_store();
    seed_touchpoints(
        &store,
        &[
            touchpoint("old", "2024-01-01T00:00:00Z", "Mentorship", &[]),
            touchpoint("mid", "2024-06-01T00:00:00Z", "Mentorship", &[]),
            touchpoint("new", "2025-01-01T00:00:00Z", "Mentorship", &[]),
        ],
    );

    let result = store.list_touchpoints(&since("2024-12-31T00:00:00Z")).unwrap();
    let ids: Vec<&str> = result.iter().map(|tp| tp.id.as_str()).collect();
    assert_eq!(ids, vec!["new"]);

    let inclusive = store.list_touchpoints(&since("2024-06-01T00:00:00Z")).unwrap();
    assert_eq!(inclusive.len(), 2);
}

#[test]
fn malformed_start_date_is_a_validation_error() {
    let (_tmp, store) = test_store();
    let err = store.list_touchpoints(&since("2024-12-31")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn malformed_stored_date_is_skipped_only_when_date_filtering() {
    let (_tmp, store) = test_store();
    seed_touchpoints(
        &store,
        &[
            touchpoint("bad", "last tuesday", "Mentorship", &[]),
            touchpoint("good", "2025-01-01T00:00:00Z", "Mentorship", &[]),
        ],
    );

    assert_eq!(store.list_touchpoints(&no_filter()).unwrap().len(), 2);
    let filtered = store.list_touchpoints(&since("2020-01-01T00:00:00Z")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "good");
}

#[test]
fn update_replaces_fields_but_keeps_identity() {
    let (_tmp, store) = test_store();
    let created = store.create_touchpoint(input("draft")).unwrap();

    let updated = store
        .update_touchpoint(
            &created.id,
            TouchpointInput {
                description: "<em>final</em>".into(),
                category: "Process improvement".into(),
                tags: Some(vec!["security".into(), "docker".into()]),
                people_involved: None,
                url: None,
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.description, "final");
    assert_eq!(updated.category, "Process improvement");
    assert_eq!(updated.tags, vec!["security", "docker"]);
    assert!(updated.people_involved.is_empty());
    assert_eq!(updated.url, None);

    assert_eq!(store.list_touchpoints(&TouchpointFilter::default()).unwrap(), vec![updated]);
}

#[test]
fn update_missing_id_is_not_found() {
    let (_tmp, store) = test_store();
    let err = store.update_touchpoint("nope", input("x")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "touchpoint", .. }));
}

#[test]
fn update_validates_before_lookup() {
    let (_tmp, store) = test_store();
    let created = store.create_touchpoint(input("keep me")).unwrap();
    let mut bad = input("changed");
    bad.tags = Some(vec!["unknown".into()]);

    assert!(matches!(
        store.update_touchpoint(&created.id, bad),
        Err(StoreError::Validation(_))
    ));
    assert_eq!(touchpoints_on_disk(&store)[0].description, "keep me");
}

#[test]
fn delete_removes_exactly_one() {
    let (_tmp, store) = test_store();
    let a = store.create_touchpoint(input("a")).unwrap();
    let b = store.create_touchpoint(input("b")).unwrap();

    store.delete_touchpoint(&a.id).unwrap();

    let remaining = store.list_touchpoints(&no_filter()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);

    let err = store.delete_touchpoint(&a.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.list_touchpoints(&no_filter()).unwrap().len(), 1);
}

#[test]
fn removed_vocabulary_does_not_invalidate_existing_records() {
    let (_tmp, store) = test_store();
    let created = store.create_touchpoint(input("uses go")).unwrap();

    store.remove_tag("go").unwrap();
    store.remove_category("Mentorship").unwrap();

    let listed = store.list_touchpoints(&no_filter()).unwrap();
    assert_eq!(listed, vec![created.clone()]);

    // Rewriting with the stale values now fails.
    assert!(matches!(
        store.update_touchpoint(&created.id, input("uses go")),
        Err(StoreError::Validation(_))
    ));
    // Other records can still be deleted or written around it.
    store.delete_touchpoint(&created.id).unwrap();
}

#[test]
fn stats_count_records_and_vocabulary() {
    let (_tmp, store) = test_store();
    seed_touchpoints(
        &store,
        &[
            touchpoint("a", "2024-03-01T00:00:00Z", "Mentorship", &["go"]),
            touchpoint("b", "2024-01-01T00:00:00Z", "Retired", &["go", "docker"]),
            touchpoint("c", "garbage", "Mentorship", &[]),
        ],
    );
    store.create_report("2024-q1.md", "# Q1").unwrap();

    let stats = store.stats().unwrap();
    assert_eq!(stats.total_touchpoints, 3);
    assert_eq!(stats.by_category.get("Mentorship"), Some(&2));
    assert_eq!(stats.by_category.get("Retired"), Some(&1));
    assert_eq!(stats.by_tag.get("go"), Some(&2));
    assert_eq!(stats.oldest.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(stats.newest.as_deref(), Some("2024-03-01T00:00:00Z"));
    assert_eq!(stats.category_count, 10);
    assert_eq!(stats.tag_count, 4);
    assert_eq!(stats.report_count, 1);
}
