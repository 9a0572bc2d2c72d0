//! Tests for the config-watch control loop

mod common;

use common::{Event, MockFactory, RecordingSink};
use kpush_core::{
    ConfigLoader, JobFilter, JobRegistry, ShutdownSignal, Wake, WatchLoop, WatchState,
};
use kpush_test_utils::TestHome;
use pretty_assertions::assert_eq;
use std::thread;
use std::time::{Duration, Instant};

const INTERVAL: Duration = Duration::from_millis(100);

fn home_with(names: &[&str]) -> TestHome {
    let home = TestHome::new();
    for name in names {
        home.write_descriptor(name);
    }
    home
}

/// A sleeper that runs `action` on the first sleep and is interrupted after.
fn once<F: FnMut()>(mut action: F) -> impl FnMut(Duration) -> Wake {
    let mut calls = 0;
    move |_| {
        calls += 1;
        if calls == 1 {
            action();
            Wake::Elapsed
        } else {
            Wake::Interrupted
        }
    }
}

fn load(loader: &ConfigLoader<&MockFactory>, home: &TestHome) -> JobRegistry<common::MockJob> {
    loader.load(&home.config_dir()).unwrap().0
}

#[test]
fn test_start_watches_every_job() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let mut watch = WatchLoop::new(
        &loader,
        INTERVAL,
        |_: Duration| Wake::Interrupted,
        RecordingSink::default(),
    );
    assert_eq!(watch.state(), WatchState::Idle);
    let registry = watch.start(registry);

    assert_eq!(watch.state(), WatchState::Running);
    assert!(registry.iter().all(|j| j.is_watching()));
    let started: Vec<_> = factory
        .events()
        .into_iter()
        .map(|e| match e {
            Event::Started { name, .. } => name,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(started, vec!["x", "y"]);
}

#[test]
fn test_removed_config_evicts_job_within_one_tick() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let sleeper = once(|| home.remove_descriptor("x"));
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);

    let (registry, report) = watch.tick(registry);
    assert_eq!(report.removed, vec!["x"]);
    assert_eq!(registry.names(), vec!["y"]);
    assert_eq!(factory.stop_count("x"), 1);
    assert_eq!(factory.stop_count("y"), 0);

    let (registry, report) = watch.tick(registry);
    assert!(report.interrupted);
    let registry = watch.shutdown(registry);

    assert_eq!(factory.stop_count("x"), 1);
    assert_eq!(factory.stop_count("y"), 1);
    assert_eq!(registry.names(), vec!["y"]);
    let sink = watch.sink();
    assert_eq!(sink.renders, vec![vec!["x", "y"], vec!["y"]]);
    assert_eq!(sink.notices, vec!["x removed", "Exited"]);
}

#[test]
fn test_changed_config_reloads_job_and_leaves_others() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);
    let x_id = registry.get("x").unwrap().id;
    let y_id = registry.get("y").unwrap().id;

    let sleeper = once(|| {
        home.write_descriptor_for("x", "x", "staging");
    });
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);
    factory.clear();

    let (registry, report) = watch.tick(registry);

    assert_eq!(report.reloaded, vec!["x"]);
    let x = registry.get("x").unwrap();
    assert_eq!(x.namespace(), "staging");
    assert_eq!(x.id, 3);
    assert!(x.is_watching());
    assert_eq!(registry.get("y").unwrap().id, y_id);
    assert_eq!(
        factory.events(),
        vec![
            Event::Stopped { name: "x".into(), id: x_id },
            Event::Started { name: "x".into(), id: 3 },
        ]
    );
    assert_eq!(watch.sink().notices, vec!["x changed"]);
}

#[test]
fn test_unchanged_configs_are_left_alone() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let mut watch = WatchLoop::new(&loader, INTERVAL, once(|| {}), RecordingSink::default());
    let registry = watch.start(registry);
    factory.clear();

    let (registry, report) = watch.tick(registry);

    assert_eq!(report, kpush_core::TickReport::default());
    assert_eq!(registry.names(), vec!["x", "y"]);
    assert!(factory.events().is_empty());
    assert_eq!(factory.builds(), 2);
}

#[test]
fn test_renamed_job_is_inserted_in_sorted_position() {
    let home = home_with(&["m", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let sleeper = once(|| {
        home.write_descriptor_for("y", "a", "default");
    });
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);

    let (registry, report) = watch.tick(registry);

    assert_eq!(report.reloaded, vec!["a"]);
    assert_eq!(registry.names(), vec!["a", "m"]);
}

#[test]
fn test_malformed_reload_drops_slot() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let sleeper = once(|| {
        home.write_config("x.yaml", "name: [broken\n");
    });
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);

    let (registry, report) = watch.tick(registry);

    assert_eq!(report.dropped, vec!["x"]);
    assert!(report.reloaded.is_empty());
    assert_eq!(registry.names(), vec!["y"]);
    assert_eq!(factory.stop_count("x"), 1);

    // The slot is not retried on later ticks.
    let (registry, report) = watch.reconcile(registry);
    assert_eq!(report, kpush_core::TickReport::default());
    assert_eq!(registry.names(), vec!["y"]);
}

#[test]
fn test_reload_colliding_with_existing_name_is_dropped() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);
    let y_id = registry.get("y").unwrap().id;

    let sleeper = once(|| {
        home.write_descriptor_for("x", "y", "other");
    });
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);

    let (registry, report) = watch.tick(registry);

    assert_eq!(report.dropped, vec!["x"]);
    assert_eq!(registry.names(), vec!["y"]);
    assert_eq!(registry.get("y").unwrap().id, y_id);
    assert_eq!(factory.stop_count("y"), 0);
}

#[test]
fn test_reload_outside_filter_is_dropped() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::new(["x", "y"]));
    let registry = load(&loader, &home);

    let sleeper = once(|| {
        home.write_descriptor_for("x", "z", "default");
    });
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.start(registry);

    let (registry, report) = watch.tick(registry);

    assert_eq!(report.dropped, vec!["x"]);
    assert_eq!(registry.names(), vec!["y"]);
}

#[test]
fn test_interrupt_stops_every_job_exactly_once() {
    let home = home_with(&["a", "b", "c"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let mut watch = WatchLoop::new(
        &loader,
        INTERVAL,
        |_: Duration| Wake::Interrupted,
        RecordingSink::default(),
    );
    let registry = watch.run(registry);

    assert_eq!(watch.state(), WatchState::Stopped);
    assert!(registry.iter().all(|j| !j.is_watching()));
    for name in ["a", "b", "c"] {
        assert_eq!(factory.stop_count(name), 1, "job {name}");
    }
    assert_eq!(watch.sink().renders.len(), 1);
    assert_eq!(watch.sink().notices, vec!["Exited"]);
}

#[test]
fn test_interrupt_skips_reevaluation() {
    let home = home_with(&["x"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let sleeper = |_: Duration| {
        home.remove_descriptor("x");
        Wake::Interrupted
    };
    let mut watch = WatchLoop::new(&loader, INTERVAL, sleeper, RecordingSink::default());
    let registry = watch.run(registry);

    assert_eq!(registry.names(), vec!["x"]);
    assert_eq!(factory.stop_count("x"), 1);
}

#[test]
fn test_shutdown_signal_ends_sleep_early() {
    let home = home_with(&["x", "y"]);
    let factory = MockFactory::new();
    let loader = ConfigLoader::new(&factory, JobFilter::all());
    let registry = load(&loader, &home);

    let signal = ShutdownSignal::new();
    let remote = signal.clone();
    let trigger = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.trigger();
    });

    let started = Instant::now();
    let mut watch = WatchLoop::new(
        &loader,
        Duration::from_secs(30),
        signal,
        RecordingSink::default(),
    );
    let registry = watch.run(registry);
    trigger.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(watch.state(), WatchState::Stopped);
    assert_eq!(registry.len(), 2);
    assert_eq!(factory.stop_count("x"), 1);
    assert_eq!(factory.stop_count("y"), 1);
}
