mod common;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use common::{previewer, session, Export, FakeR, Level, MockHost};
use rbridge::{
    document::{Document, Editor, Position, Selection},
    poll::PollPolicy,
    preview::SETTLE_DELAY,
};

const CSV: &str = "a,b\n1,x\n2,y\n";

#[tokio::test]
async fn exported_frame_reaches_viewer_and_scratch_is_removed() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Write(CSV.into()));
    let host = MockHost::default();

    let ok = previewer(PollPolicy::default())
        .preview_dataframe(&session(&r), &host, ws.path(), "df")
        .await;

    assert!(ok);
    assert_eq!(host.previewed(), vec![CSV.to_string()]);
    assert!(host.messages().is_empty());
    let sent = r.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("write.csv(df, file = "));
    assert!(sent[0].ends_with(", row.names = FALSE, quote = FALSE)"));
    assert!(!ws.path().join(".tmp").exists());
}

#[tokio::test]
async fn selection_names_the_exported_object() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Write(CSV.into()));
    let host = MockHost::default();
    let mut editor = Editor::new(Document::from_text("summary(my.df)"));
    editor.selection = Selection::new(Position::new(0, 8), Position::new(0, 13));

    let ok = previewer(PollPolicy::default())
        .preview_selection(&session(&r), &host, ws.path(), &editor)
        .await;

    assert!(ok);
    assert!(r.sent()[0].starts_with("write.csv(my.df, "));
    assert!(r.sent()[0].contains("my.df.csv"));
}

#[tokio::test]
async fn suspicious_name_is_rejected_before_anything_is_sent() {
    let ws = tempfile::tempdir().unwrap();
    for name in ["df; system('rm -rf ~')", "a|b", "a`b", ""] {
        let r = FakeR::new(Export::Write(CSV.into()));
        let host = MockHost::default();

        let ok = previewer(PollPolicy::default())
            .preview_dataframe(&session(&r), &host, ws.path(), name)
            .await;

        assert!(!ok);
        assert!(r.sent().is_empty(), "sent for {name:?}");
        assert_eq!(host.levels(), vec![Level::Info]);
        assert!(!ws.path().join(".tmp").exists());
    }
}

#[tokio::test]
async fn missing_export_reports_failure() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Ignore);
    let host = MockHost::default();

    let ok = previewer(PollPolicy::default())
        .preview_dataframe(&session(&r), &host, ws.path(), "df")
        .await;

    assert!(!ok);
    assert_eq!(r.sent().len(), 1);
    let messages = host.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, Level::Error);
    assert!(messages[0].1.starts_with("Export failed"));
    assert!(host.previewed().is_empty());
    assert!(!ws.path().join(".tmp").exists());
}

#[tokio::test]
async fn oversized_export_is_abandoned() {
    let ws = tempfile::tempdir().unwrap();
    // ~100 bytes per poll interval; the ceiling is crossed about a second in,
    // well after the settle delay, so the poller watches the file grow first.
    let every = Duration::from_millis(10);
    let r = FakeR::new(Export::Grow { chunk: 20, times: 150, every });
    let host = MockHost::default();
    let policy = PollPolicy { ceiling: 2_000, ..PollPolicy::default() };
    let started = Instant::now();

    let ok = previewer(policy)
        .preview_dataframe(&session(&r), &host, ws.path(), "big")
        .await;

    assert!(!ok);
    assert!(started.elapsed() > SETTLE_DELAY + Duration::from_millis(300));
    let messages = host.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, Level::Warning);
    assert!(messages[0].1.contains("larger than the 2000 byte limit"), "{}", messages[0].1);
    assert!(host.previewed().is_empty());
    // the writer's next append finds the file gone and stops
    tokio::time::sleep(every * 5).await;
    assert!(!ws.path().join(".tmp").exists());
}

#[tokio::test]
async fn viewer_failure_still_cleans_up() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Write(CSV.into()));
    let host = MockHost::failing();

    let ok = previewer(PollPolicy::default())
        .preview_dataframe(&session(&r), &host, ws.path(), "df")
        .await;

    assert!(!ok);
    assert_eq!(host.levels(), vec![Level::Error]);
    assert!(host.messages()[0].1.contains("viewer crashed"));
    assert!(!ws.path().join(".tmp").exists());
}

#[tokio::test]
async fn empty_export_is_refused_when_nonempty_required() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Write(String::new()));
    let host = MockHost::default();
    let policy = PollPolicy {
        require_nonempty: true,
        timeout: Some(Duration::from_millis(200)),
        ..PollPolicy::default()
    };

    let ok = previewer(policy)
        .preview_dataframe(&session(&r), &host, ws.path(), "df")
        .await;

    assert!(!ok);
    assert_eq!(host.levels(), vec![Level::Warning]);
    assert!(!ws.path().join(".tmp").exists());
}

#[tokio::test]
async fn concurrent_previews_take_turns() {
    let ws = tempfile::tempdir().unwrap();
    let r = FakeR::new(Export::Write(CSV.into()));
    let host = Arc::new(MockHost::default());
    let previewer = previewer(PollPolicy::default());
    let session = session(&r);

    let (a, b) = tokio::join!(
        previewer.preview_dataframe(&session, host.as_ref(), ws.path(), "df"),
        previewer.preview_dataframe(&session, host.as_ref(), ws.path(), "df"),
    );

    assert!(a && b);
    assert_eq!(host.previewed().len(), 2);
    assert_eq!(r.spawn_count(), 1);
    assert!(!ws.path().join(".tmp").exists());
}
