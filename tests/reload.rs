//! Registry reload: file watcher, explicit reload and cache invalidation.

use std::time::Duration;

use link_mirror::bot::{spawn_line_reader, Session};
use link_mirror::config::BotConfig;
use link_mirror::lifecycle::{signals, startup, Shutdown};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

mod common;

const SERVICES_NO_WHITELIST: &str = r#"{
    "example.com": {},
    "youtube.com": { "alt_domains": ["m.youtube.com", "youtu.be"] },
    "twitter.com": {}
}"#;

fn config(fixture: &common::Fixture, watch: bool) -> BotConfig {
    let mut config = BotConfig::default();
    config.registry = fixture.registry_config();
    config.registry.watch = watch;
    config
}

#[tokio::test]
async fn test_explicit_reload_applies_new_whitelist() {
    let fixture = common::Fixture::standard();
    let runtime = startup::start(config(&fixture, false));
    let link = "https://example.com/p?x=1&y=2";

    let before = runtime.handle.load().substitute(link);
    assert_eq!(before.first(), Some("https://mirror.example/p?x=1"));
    // The outcome is memoized until the registry changes.
    assert_eq!(runtime.handle.load().cached(), 1);

    fixture.rewrite_services(SERVICES_NO_WHITELIST);
    signals::reload_registry(&runtime.handle, &runtime.config.registry).unwrap();

    let engine = runtime.handle.load();
    assert_eq!(engine.cached(), 0);
    assert_eq!(engine.substitute(link).first(), Some("https://mirror.example/p"));
}

#[tokio::test]
async fn test_watcher_reloads_on_change() {
    let fixture = common::Fixture::standard();
    let runtime = startup::start(config(&fixture, true));
    let initial = runtime.handle.load().registry().generation();

    // Give the watcher a moment to register before modifying the file.
    tokio::time::sleep(Duration::from_millis(200)).await;
    fixture.rewrite_services(SERVICES_NO_WHITELIST);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let engine = runtime.handle.load();
        if engine.registry().generation() != initial
            && engine.registry().service("example.com").map(|s| s.query_whitelist.is_empty()) == Some(true)
        {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "registry was not reloaded");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let outcome = runtime.handle.load().substitute("example.com/p?x=1");
    assert_eq!(outcome.first(), Some("https://mirror.example/p"));
}

#[tokio::test]
async fn test_half_written_file_keeps_registry() {
    let fixture = common::Fixture::standard();
    let runtime = startup::start(config(&fixture, true));
    let initial = runtime.handle.load().registry().generation();

    tokio::time::sleep(Duration::from_millis(200)).await;
    fixture.rewrite_services(r#"{ "example.com": { "query_whi"#);
    assert_eq!(signals::reload_registry(&runtime.handle, &runtime.config.registry), None);

    // Let the watcher see the broken write too.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let engine = runtime.handle.load();
    assert_eq!(engine.registry().generation(), initial);
    assert_eq!(
        engine.substitute("example.com/p?x=1").first(),
        Some("https://mirror.example/p?x=1")
    );
}

#[tokio::test]
async fn test_session_uses_engine_current_per_message() {
    let fixture = common::Fixture::standard();
    let runtime = startup::start(config(&fixture, false));
    let shutdown = Shutdown::new();

    let (client, server) = tokio::io::duplex(1024);
    let (server_read, server_write) = tokio::io::split(server);
    let session = Session::new(
        spawn_line_reader(BufReader::new(server_read)),
        server_write,
        runtime.handle.clone(),
        runtime.config.reply.clone(),
    );
    let task = tokio::spawn(session.run(shutdown.subscribe()));

    let (client_read, mut client_write) = tokio::io::split(client);
    let mut replies = BufReader::new(client_read).lines();

    client_write.write_all(b"look: example.com/a?x=1\n").await.unwrap();
    assert_eq!(
        replies.next_line().await.unwrap().as_deref(),
        Some("https://mirror.example/a?x=1")
    );

    fixture.rewrite_services(SERVICES_NO_WHITELIST);
    signals::reload_in_background(runtime.handle.clone(), runtime.config.registry.clone())
        .await
        .unwrap();

    client_write.write_all(b"again example.com/a?x=1\n").await.unwrap();
    assert_eq!(
        replies.next_line().await.unwrap().as_deref(),
        Some("https://mirror.example/a")
    );

    shutdown.trigger();
    let stats = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("session did not stop")
        .unwrap();
    assert_eq!(stats.messages, 2);
    assert_eq!(stats.replies, 2);
}
