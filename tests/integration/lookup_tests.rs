//! End-to-end lookup workflow against a scripted fetcher.

use rustdict::cache::{CacheStore, PutOutcome, Record};
use rustdict::error::LookupError;
use rustdict::lookup::{lookup_all, Dictionary, LookupOptions, LookupOutcome};
use rustdict::signal::ShutdownHandler;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

use super::support::{echo_dictionary, text, ScriptedFetcher};

fn options() -> LookupOptions {
    LookupOptions::default()
}

#[test]
fn test_cache_hit_skips_network() {
    let fetcher = ScriptedFetcher::new();
    let cache = CacheStore::open_in_memory().unwrap();
    cache
        .put(&Record::new("hello", "p1", json!({"text": "cached"})))
        .unwrap();
    let dict = echo_dictionary("p1", cache, fetcher.clone());

    let mut out = Vec::new();
    let outcome = dict.lookup("hello", &options(), &mut out);

    assert_eq!(outcome, LookupOutcome::CacheHit);
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(text(out), "<p1:hello:cached>\n");
}

#[test]
fn test_disabled_cache_still_writes() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Ok("fresh".to_string()));
    let cache = CacheStore::open_in_memory().unwrap();
    cache
        .put(&Record::new("hello", "p1", json!({"text": "stale"})))
        .unwrap();
    let dict = echo_dictionary("p1", cache, fetcher.clone());

    let opts = LookupOptions {
        disable_cache: true,
        ..options()
    };
    let mut out = Vec::new();
    let outcome = dict.lookup("hello", &opts, &mut out);

    assert_eq!(outcome, LookupOutcome::Fetched(Some(PutOutcome::Updated)));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(text(out), "<p1:hello:fresh>\n");
    assert_eq!(
        dict.cache().get("hello", "p1").unwrap().unwrap().content,
        json!({"text": "fresh"})
    );
}

#[test]
fn test_disabled_cache_with_same_content_is_unchanged() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Ok("same".to_string()));
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher.clone());

    let opts = LookupOptions {
        disable_cache: true,
        ..options()
    };
    let mut out = Vec::new();
    assert_eq!(
        dict.lookup("hello", &opts, &mut out),
        LookupOutcome::Fetched(Some(PutOutcome::Inserted))
    );
    assert_eq!(
        dict.lookup("hello", &opts, &mut out),
        LookupOutcome::Fetched(Some(PutOutcome::Unchanged))
    );
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(dict.cache().len().unwrap(), 1);
}

#[test]
fn test_timeout_reports_and_writes_nothing() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Err(LookupError::Timeout));
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher);

    let mut out = Vec::new();
    let outcome = dict.lookup("hello", &options(), &mut out);

    assert_eq!(outcome, LookupOutcome::Failed(LookupError::Timeout));
    let output = text(out);
    assert!(output.contains("timed out"));
    assert_eq!(output.lines().count(), 1);
    assert!(dict.cache().is_empty().unwrap());
}

#[test]
fn test_http_error_status_is_query_error() {
    let fetcher = ScriptedFetcher::new();
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher);

    let mut out = Vec::new();
    let outcome = dict.lookup("zzz", &options(), &mut out);

    assert_eq!(
        outcome,
        LookupOutcome::Failed(LookupError::Query {
            word: "zzz".to_string(),
            status: 404,
        })
    );
    assert!(text(out).contains("404"));
    assert!(dict.cache().is_empty().unwrap());
}

#[test]
fn test_provider_not_found_is_not_cached() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/qwzx", Ok("-".to_string()));
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher);

    let mut out = Vec::new();
    let outcome = dict.lookup("qwzx", &options(), &mut out);

    assert_eq!(
        outcome,
        LookupOutcome::Failed(LookupError::NotFound {
            word: "qwzx".to_string()
        })
    );
    assert!(text(out).contains("\"qwzx\" not found"));
    assert!(dict.cache().is_empty().unwrap());
}

#[test]
fn test_failure_then_success_caches_second_result() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Err(LookupError::NoNetwork));
    fetcher.respond("http://p1.test/hello", Ok("back online".to_string()));
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher.clone());

    let mut out = Vec::new();
    assert!(!dict.lookup("hello", &options(), &mut out).is_rendered());
    assert!(dict.lookup("hello", &options(), &mut out).is_rendered());
    assert_eq!(dict.lookup("hello", &options(), &mut out), LookupOutcome::CacheHit);
    assert_eq!(fetcher.calls(), 2);
}

#[test]
fn test_words_are_normalized_before_keying() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Ok("hi".to_string()));
    let dict = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher.clone());

    let mut out = Vec::new();
    dict.lookup("  HELLO\t", &options(), &mut out);
    assert_eq!(dict.lookup("Hello", &options(), &mut out), LookupOutcome::CacheHit);
    assert_eq!(fetcher.urls(), vec!["http://p1.test/hello"]);
}

#[test]
fn test_batch_is_word_major() {
    let fetcher = ScriptedFetcher::new();
    for word in ["alpha", "beta"] {
        for provider in ["p1", "p2"] {
            fetcher.respond(
                &format!("http://{provider}.test/{word}"),
                Ok(format!("{word}-{provider}")),
            );
        }
    }
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("rustdict.db");
    let dictionaries = vec![
        echo_dictionary("p1", CacheStore::open(&db_path).unwrap(), fetcher.clone()),
        echo_dictionary("p2", CacheStore::open(&db_path).unwrap(), fetcher.clone()),
    ];

    let mut out = Vec::new();
    let summary = lookup_all(
        &["alpha", "beta"],
        &dictionaries,
        &options(),
        &ShutdownHandler::new(),
        &mut out,
    );

    assert_eq!(summary.fetched, 4);
    assert!(!summary.interrupted);
    assert_eq!(
        text(out).lines().collect::<Vec<_>>(),
        vec![
            "<p1:alpha:alpha-p1>",
            "<p2:alpha:alpha-p2>",
            "<p1:beta:beta-p1>",
            "<p2:beta:beta-p2>",
        ]
    );
}

#[test]
fn test_batch_continues_after_failure() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/one", Err(LookupError::Unexpected("reset".into())));
    fetcher.respond("http://p1.test/two", Ok("second".to_string()));
    let dictionaries = vec![echo_dictionary(
        "p1",
        CacheStore::open_in_memory().unwrap(),
        fetcher.clone(),
    )];

    let mut out = Vec::new();
    let summary = lookup_all(
        &["one", "two"],
        &dictionaries,
        &options(),
        &ShutdownHandler::new(),
        &mut out,
    );

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.fetched, 1);
    let output = text(out);
    assert!(output.contains("Unexpected error: reset"));
    assert!(output.contains("<p1:two:second>"));
}

#[test]
fn test_provider_and_url_tags_precede_result() {
    let fetcher = ScriptedFetcher::new();
    fetcher.respond("http://p1.test/hello", Ok("hi".to_string()));
    let dict: Dictionary = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), fetcher);
    rustdict::theme::set_color_enabled(false);

    let opts = LookupOptions {
        show_provider: true,
        show_url: true,
        ..options()
    };
    let mut out = Vec::new();
    dict.lookup("hello", &opts, &mut out);

    assert_eq!(
        text(out).lines().collect::<Vec<_>>(),
        vec!["[p1]", "(http://p1.test/hello)", "<p1:hello:hi>"]
    );
}

#[test]
fn test_fetcher_is_shared_across_dictionaries() {
    let fetcher = ScriptedFetcher::new();
    let shared: Arc<ScriptedFetcher> = Arc::clone(&fetcher);
    let a = echo_dictionary("p1", CacheStore::open_in_memory().unwrap(), shared.clone());
    let b = echo_dictionary("p2", CacheStore::open_in_memory().unwrap(), shared);

    let mut out = Vec::new();
    a.lookup("x", &options(), &mut out);
    b.lookup("x", &options(), &mut out);
    assert_eq!(fetcher.calls(), 2);
}
