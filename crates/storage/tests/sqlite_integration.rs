use exam_core::model::{
    AnswerKey, IrtParams, Item, ItemId, Modality, Response, Section, SectionId, SessionId,
    SessionSnapshot, Verdict,
};
use exam_core::time::fixed_now;
use storage::repository::SnapshotRepository;
use storage::sqlite::SqliteRepository;

fn build_snapshot(id: &str) -> SessionSnapshot {
    let items = vec![
        Item::new(ItemId::new("q1"), "Expand (x+1)^2", Modality::Quant)
            .with_irt(IrtParams::new(1.0, 0.0).unwrap())
            .with_key(AnswerKey::expression("(x+1)^2", vec!["x".into()])),
        Item::new(ItemId::new("q2"), "2+2?", Modality::Quant)
            .with_key(AnswerKey::numeric(4.0, 0.0).unwrap()),
    ];
    let section = Section::new(SectionId::new("sec-1"), "Quantitative", items);
    SessionSnapshot::new(SessionId::new(id), vec![section], fixed_now())
}

#[tokio::test]
async fn sqlite_round_trips_a_reachable_snapshot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut snapshot = build_snapshot("s-roundtrip");
    snapshot.thetas.insert(SectionId::new("sec-1"), 0.3);
    snapshot.responses.insert(
        ItemId::new("q1"),
        Response::new("(x+1)^2", fixed_now(), Verdict::Correct),
    );
    snapshot.draft_answer = "4".into();
    snapshot.heartbeat_attempted_at_ms = Some(1_700_000_015_000);

    repo.save(&snapshot).await.unwrap();
    let loaded = repo
        .load(&SessionId::new("s-roundtrip"))
        .await
        .unwrap()
        .expect("snapshot stored");
    assert_eq!(loaded, snapshot);
}

#[tokio::test]
async fn sqlite_upserts_one_record_per_session() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut snapshot = build_snapshot("s-upsert");
    repo.save(&snapshot).await.unwrap();

    snapshot.active_item = 1;
    snapshot.draft_answer = "revised".into();
    repo.save(&snapshot).await.unwrap();

    let loaded = repo
        .load(&SessionId::new("s-upsert"))
        .await
        .unwrap()
        .expect("snapshot stored");
    assert_eq!(loaded.active_item, 1);
    assert_eq!(loaded.draft_answer, "revised");

    let missing = repo.load(&SessionId::new("s-other")).await.unwrap();
    assert!(missing.is_none());
}
