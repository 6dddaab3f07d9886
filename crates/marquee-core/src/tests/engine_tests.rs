//! Tests for the engine loop: real timers under paused time, scripted lookups

use super::fixtures::*;
use crate::config::Config;
use crate::{EngineHandle, Error, SuggestionEngine};
use marquee_types::{ControllerUpdate, Key};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time::sleep;

struct Harness {
    catalog: ScriptedCatalog,
    router: RecordingRouter,
    handle: EngineHandle,
    updates: UnboundedReceiver<ControllerUpdate>,
    task: JoinHandle<()>,
}

fn start(config: &Config) -> Harness {
    let catalog = ScriptedCatalog::default();
    let router = RecordingRouter::default();
    let (handle, updates, task) =
        SuggestionEngine::spawn(config, Arc::new(catalog.clone()), Arc::new(router.clone()))
            .unwrap();
    Harness {
        catalog,
        router,
        handle,
        updates,
        task,
    }
}

/// Let spawned tasks run to idle
async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

/// Type a query and wait out the debounce interval
async fn type_query(h: &Harness, query: &str) {
    h.handle.set_query(query).unwrap();
    sleep(Duration::from_millis(301)).await;
}

fn drain(updates: &mut UnboundedReceiver<ControllerUpdate>) -> Vec<ControllerUpdate> {
    let mut drained = Vec::new();
    while let Ok(update) = updates.try_recv() {
        drained.push(update);
    }
    drained
}

#[tokio::test(start_paused = true)]
async fn test_initial_snapshot_published() {
    let mut h = start(&uncached_config());
    settle().await;

    match drain(&mut h.updates).as_slice() {
        [ControllerUpdate::Snapshot(snapshot)] => {
            assert_eq!(snapshot.query, "");
            assert_eq!(snapshot.selected_index, -1);
            assert!(!snapshot.panel_visible);
        }
        other => panic!("unexpected updates: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_lookup_waits_for_quiet_interval() {
    let h = start(&uncached_config());

    for query in ["t", "th", "the"] {
        h.handle.set_query(query).unwrap();
        sleep(Duration::from_millis(100)).await;
    }
    assert!(h.catalog.calls().is_empty());

    sleep(Duration::from_millis(199)).await;
    assert!(h.catalog.calls().is_empty());

    sleep(Duration::from_millis(2)).await;
    assert_eq!(h.catalog.calls(), vec!["the"]);
    assert_eq!(h.handle.snapshot().await.unwrap().query, "the");
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_reaches_catalog() {
    let h = start(&uncached_config());
    type_query(&h, "a").await;
    sleep(Duration::from_secs(5)).await;

    assert!(h.catalog.calls().is_empty());
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(!snapshot.panel_visible);
    assert!(!snapshot.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_results_keep_latest_query() {
    let h = start(&uncached_config());
    type_query(&h, "ab").await;
    type_query(&h, "abc").await;
    assert_eq!(h.catalog.calls(), vec!["ab", "abc"]);

    h.catalog.resolve("abc", Ok(vec![movie(2, "Abc")]));
    settle().await;
    h.catalog.resolve("ab", Ok(vec![movie(1, "Ab"), movie(11, "Ab 2")]));
    settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    let ids: Vec<u64> = snapshot.suggestions.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![2]);
    assert!(!snapshot.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_lookup_failure_shows_empty_panel() {
    let h = start(&uncached_config());
    type_query(&h, "the matrix").await;
    assert!(h.handle.snapshot().await.unwrap().is_loading);

    h.catalog.fail("the matrix");
    settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.suggestions.is_empty());
    assert!(snapshot.panel_visible);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.view_all_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_enter_navigates_once_and_closes() {
    let mut h = start(&uncached_config());
    type_query(&h, "jane").await;
    h.catalog.resolve(
        "jane",
        Ok(vec![movie(10, "Jane Eyre"), person(42, "Jane Doe")]),
    );
    settle().await;

    h.handle.key(Key::ArrowDown).unwrap();
    h.handle.key(Key::ArrowDown).unwrap();
    h.handle.key(Key::Enter).unwrap();
    settle().await;

    assert_eq!(h.router.targets(), vec!["/person/jane-doe-42"]);

    let updates = drain(&mut h.updates);
    let navigated: Vec<String> = updates
        .iter()
        .filter_map(|u| match u {
            ControllerUpdate::Navigated { target } => Some(target.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(navigated, vec!["/person/jane-doe-42"]);
    assert!(matches!(updates.last(), Some(ControllerUpdate::Snapshot(_))));
    assert!(updates.contains(&ControllerUpdate::Closed));

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.query, "");
    assert!(!snapshot.panel_visible);
    assert_eq!(snapshot.selected_index, -1);
}

#[tokio::test(start_paused = true)]
async fn test_enter_during_lookup_searches_query() {
    let h = start(&uncached_config());
    type_query(&h, "the matrix").await;

    h.handle.key(Key::Enter).unwrap();
    settle().await;
    assert_eq!(h.router.targets(), vec!["/search?q=the%20matrix"]);

    // The abandoned lookup resolving after the cleared query settles changes nothing
    sleep(Duration::from_millis(301)).await;
    h.catalog.resolve("the matrix", Ok(movies(3)));
    settle().await;
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.suggestions.is_empty());
    assert_eq!(h.router.targets().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_escape_hides_then_closes() {
    let mut h = start(&uncached_config());
    type_query(&h, "alien").await;
    h.catalog.resolve("alien", Ok(vec![movie(348, "Alien")]));
    settle().await;
    drain(&mut h.updates);

    h.handle.key(Key::Escape).unwrap();
    settle().await;
    assert!(!h.handle.snapshot().await.unwrap().panel_visible);
    assert!(!drain(&mut h.updates).contains(&ControllerUpdate::Closed));

    h.handle.key(Key::Escape).unwrap();
    settle().await;
    assert_eq!(drain(&mut h.updates), vec![ControllerUpdate::Closed]);
    assert!(h.router.targets().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_click_outside_publishes_once() {
    let mut h = start(&uncached_config());
    type_query(&h, "alien").await;
    h.catalog.resolve("alien", Ok(vec![movie(348, "Alien")]));
    settle().await;
    drain(&mut h.updates);

    h.handle.click_outside().unwrap();
    h.handle.click_outside().unwrap();
    settle().await;

    let updates = drain(&mut h.updates);
    assert_eq!(updates.len(), 1, "unchanged snapshot is not republished");
    match &updates[0] {
        ControllerUpdate::Snapshot(snapshot) => {
            assert!(!snapshot.panel_visible);
            assert_eq!(snapshot.query, "alien");
        }
        other => panic!("unexpected update: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_cached_query_skips_catalog() {
    let h = start(&Config::default());
    type_query(&h, "alien").await;
    h.catalog.resolve("alien", Ok(vec![movie(348, "Alien")]));
    settle().await;
    type_query(&h, "aliens").await;
    h.catalog.resolve("aliens", Ok(vec![movie(679, "Aliens")]));
    settle().await;

    type_query(&h, "alien").await;
    assert_eq!(h.catalog.calls(), vec!["alien", "aliens"]);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.suggestions[0].id(), 348);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_engine() {
    let h = start(&uncached_config());
    h.handle.shutdown();
    h.task.await.unwrap();

    assert!(matches!(
        h.handle.set_query("alien"),
        Err(Error::EngineStopped)
    ));
    assert!(matches!(
        h.handle.snapshot().await,
        Err(Error::EngineStopped)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_engine_stops_when_handles_dropped() {
    let Harness { handle, task, .. } = start(&uncached_config());
    let clone = handle.clone();
    drop(handle);
    clone.set_query("a").unwrap();
    drop(clone);

    // The pending debounce timer still reports back before the loop ends
    task.await.unwrap();
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = uncached_config();
    config.suggest.max_suggestions = 0;
    let result = SuggestionEngine::new(
        &config,
        Arc::new(ScriptedCatalog::default()),
        Arc::new(RecordingRouter::default()),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}
