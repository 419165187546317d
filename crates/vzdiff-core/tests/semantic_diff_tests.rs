#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use common::*;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration as StdDuration, UNIX_EPOCH};
use vzdiff_core::diff::{diff, Comparison};

#[test]
fn test_strings() {
    let from = X {
        string1: s("sanitize"),
        ..X::default()
    };
    let mut to = from.clone();
    verify_diff(&from, &to, false, "string unchanged");
    verify_diff(&from, &X::default(), false, "string not specified");
    to.string1 = s("fooa");
    verify_diff(&from, &to, true, "string changed");

    let from = X {
        string1: s("sanitize"),
        string2: s("foo2"),
        string3: Some(s("foo3")),
        ..X::default()
    };
    let to = X {
        string1: s("sanitize"),
        ..X::default()
    };
    verify_diff(&from, &to, false, "optional string not specified");
    let to = X {
        string1: s("sanitize"),
        string3: Some(s("foo3a")),
        ..X::default()
    };
    verify_diff(&from, &to, true, "optional string changed");
}

#[test]
fn test_ints() {
    let from = X {
        int1: 3,
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "int unchanged");
    verify_diff(&from, &X::default(), false, "int not specified");
    let to = X {
        int1: 4,
        ..X::default()
    };
    verify_diff(&from, &to, true, "int changed");

    let from = X {
        int1: 3,
        int2: Some(4),
        ..X::default()
    };
    let to = X {
        int1: 3,
        ..X::default()
    };
    verify_diff(&from, &to, false, "optional int not specified");
    let to = X {
        int1: 3,
        int2: Some(5),
        ..X::default()
    };
    verify_diff(&from, &to, true, "optional int changed");

    let from = X {
        int32: 4,
        int64: Some(6),
        ..X::default()
    };
    verify_diff(&from, &X::default(), false, "narrow and optional ints not specified");
    let to = X {
        int32: 5,
        ..X::default()
    };
    verify_diff(&from, &to, true, "int32 changed");
    let to = X {
        int64: Some(7),
        ..X::default()
    };
    verify_diff(&from, &to, true, "optional int64 changed");
}

#[test]
fn test_string_slices() {
    let from = X {
        string_slice: strings(&["foo1", "foo2", "foo3"]),
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "slice unchanged");
    verify_diff(&from, &X::default(), false, "slice not specified");

    let to = X {
        string_slice: strings(&["foo1", "foo2", "foo4"]),
        ..X::default()
    };
    verify_diff(&from, &to, true, "slice element changed");

    let to = X {
        string_slice: strings(&["foo1", "foo2"]),
        ..X::default()
    };
    verify_diff(&from, &to, true, "slice truncated");
}

#[test]
fn test_record_slices() {
    let from = X {
        y_slice1: vec![y("foo1", 2), y("foo2", 3)],
        y_slice2: vec![Rc::new(y("foo1", 2)), Rc::new(y("foo2", 3))],
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "record slices unchanged");
    verify_diff(&from, &X::default(), false, "record slices not specified");

    let to = X {
        y_slice1: vec![y("foo1", 2), y("foo3", 4), y("foo2", 3)],
        ..X::default()
    };
    verify_diff(&from, &to, true, "record inserted shifts positions");

    let to = X {
        y_slice1: vec![y("foo1", 2), y("foo2", 4)],
        ..X::default()
    };
    verify_diff(&from, &to, true, "nested record field changed");

    let to = X {
        y_slice2: vec![Rc::new(y("foo1", 2)), Rc::new(y("foo2", 4))],
        ..X::default()
    };
    verify_diff(&from, &to, true, "shared record field changed");

    // zero-valued fields inside an element are still suppressed
    let to = X {
        y_slice1: vec![y("foo1", 0), y("", 3)],
        ..X::default()
    };
    verify_diff(&from, &to, false, "unset fields inside elements");
}

#[test]
fn test_string_maps() {
    let from = X {
        string_map: string_map(&[("foo1", "bar1"), ("foo2", "bar2"), ("foo3", "bar3")]),
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "map unchanged");
    verify_diff(&from, &X::default(), false, "map not specified");

    let cases = [
        (
            &[("foo1", "bar1"), ("foo2", "bar2"), ("foo3", "bar3"), ("foo4", "bar4")][..],
            true,
            "entry added",
        ),
        (
            &[("foo1", "bar1"), ("foo2", "bar2"), ("foo3", "bar4")][..],
            true,
            "entry changed",
        ),
        (
            &[("foo1", "bar1"), ("foo2", "bar2"), ("foo4", "bar4")][..],
            true,
            "entry added, one removed",
        ),
        (
            &[("foo1", "bar1"), ("foo2", "bar2")][..],
            false,
            "entry removed only",
        ),
    ];
    for (entries, expect, description) in cases {
        let to = X {
            string_map: string_map(entries),
            ..X::default()
        };
        verify_diff(&from, &to, expect, description);
    }
}

#[test]
fn test_record_maps() {
    let ymap = |entries: &[(&str, Y)]| -> HashMap<String, Y> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    };
    let from = X {
        y_map: ymap(&[("foo1", y("foo1", 2)), ("foo2", y("foo2", 3))]),
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "record map unchanged");
    verify_diff(&from, &X::default(), false, "record map not specified");

    let to = X {
        y_map: ymap(&[
            ("foo1", y("foo1", 2)),
            ("foo2", y("foo2", 3)),
            ("foo3", y("foo3", 4)),
        ]),
        ..X::default()
    };
    verify_diff(&from, &to, true, "record map entry added");

    let to = X {
        y_map: ymap(&[("foo1", y("foo1", 2)), ("foo2", y("foo2", 4))]),
        ..X::default()
    };
    verify_diff(&from, &to, true, "record map entry changed");

    let to = X {
        y_map: ymap(&[("foo1", y("foo1", 2))]),
        ..X::default()
    };
    verify_diff(&from, &to, false, "record map entry removed only");
}

#[test]
fn test_times() {
    let now = Utc::now();
    let from = X {
        time: now,
        ..X::default()
    };
    verify_diff(&from, &from.clone(), false, "time unchanged");
    verify_diff(&from, &X::default(), false, "time not specified");
    let to = X {
        time: now + Duration::hours(1),
        ..X::default()
    };
    verify_diff(&from, &to, true, "time changed");
}

#[test]
fn test_zero_timestamp_in_any_timezone_is_unset() {
    let offset = FixedOffset::west_opt(7 * 3600).unwrap();
    let epoch_elsewhere = offset.timestamp_opt(0, 0).unwrap();
    let reference = Utc::now();
    assert_eq!(diff(&reference, &epoch_elsewhere.with_timezone(&Utc)), "");
    assert_eq!(diff(&reference.fixed_offset(), &epoch_elsewhere), "");
}

#[test]
fn test_system_times() {
    let earlier = UNIX_EPOCH + StdDuration::from_secs(1_700_000_000);
    let later = earlier + StdDuration::from_secs(60);
    assert_eq!(diff(&earlier, &earlier), "");
    assert_ne!(diff(&earlier, &later), "");
    assert_eq!(diff(&earlier, &UNIX_EPOCH), "", "epoch candidate is unset");
}

#[test]
fn test_system_time_beyond_calendar_range_is_compared_without_panicking() {
    let far = UNIX_EPOCH + StdDuration::from_secs(20_000_000_000_000);
    let near = UNIX_EPOCH + StdDuration::from_secs(1);
    assert_ne!(diff(&far, &near), "");
    assert_ne!(diff(&near, &far), "");
    assert_eq!(diff(&far, &far), "");
}

#[test]
fn test_same_instant_in_different_timezones_is_equal() {
    let utc = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    assert_eq!(diff(&utc.fixed_offset(), &utc.with_timezone(&offset)), "");
}

#[test]
fn test_zero_value_of_large_record_diffs_empty() {
    let reference = X {
        string1: s("foo1"),
        string3: Some(s("foo3")),
        int2: Some(4),
        int32: 5,
        string_slice: strings(&["a", "b"]),
        y_slice1: vec![y("foo1", 2)],
        string_map: string_map(&[("k", "v")]),
        time: Utc::now(),
        ..X::default()
    };
    assert_eq!(diff(&reference, &X::default()), "");
}

#[test]
fn test_root_scenarios_for_maps() {
    let three: BTreeMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let two: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    let one: BTreeMap<&str, i32> = [("a", 1)].into_iter().collect();

    assert_eq!(diff(&three, &two), "");
    assert_ne!(diff(&one, &two), "");
}

#[test]
fn test_root_candidate_unset_suppresses_everything() {
    let reference = strings(&["anything"]);
    assert_eq!(diff(&reference, &Vec::new()), "");
    assert_eq!(diff("value", ""), "");
    assert_eq!(diff(&42u32, &0u32), "");
}

#[test]
fn test_filter_is_keyed_on_candidate() {
    // Swapping the arguments makes the unset side the reference.
    let populated = X {
        string1: s("foo"),
        ..X::default()
    };
    assert_eq!(diff(&populated, &X::default()), "");
    assert_ne!(diff(&X::default(), &populated), "");
}

#[test]
fn test_booleans_are_never_unset() {
    let reference = Deployment {
        spec: DeploymentSpec {
            paused: true,
            ..DeploymentSpec::default()
        },
        ..Deployment::default()
    };
    assert_ne!(diff(&reference, &Deployment::default()), "");
    assert_eq!(diff(&false, &false), "");
}

#[test]
fn test_json_documents() {
    let live = json!({
        "metadata": {"name": "web", "uid": "1234", "labels": {"app": "web", "tier": "front"}},
        "spec": {"replicas": 3, "paused": false, "containers": [{"name": "nginx"}]}
    });
    let desired = json!({
        "metadata": {"name": "web", "labels": {"app": "web"}},
        "spec": {"replicas": 3, "containers": [{"name": "nginx", "image": ""}]}
    });
    assert_eq!(diff(&live, &desired), "");

    let desired = json!({"spec": {"replicas": 5}});
    let report = diff(&live, &desired);
    assert!(report.contains("- ") && report.contains("+ "), "{}", report);

    let desired = json!({"metadata": {"annotations": {"note": "x"}}});
    assert_ne!(diff(&live, &desired), "");

    let desired = json!({"spec": {"replicas": null}});
    assert_eq!(diff(&live, &desired), "");
}

#[test]
fn test_k8s_deployment() {
    let mut from = Deployment::default();
    let mut to = Deployment::default();
    assert_eq!(diff(&from, &to), "", "empty objects");

    from.metadata.name = s("sanitize");
    from.spec.replicas = Some(5);
    assert_eq!(diff(&from, &to), "", "values only in reference");

    to.metadata.name = s("sanitize");
    to.spec.replicas = Some(5);
    assert_eq!(diff(&from, &to), "", "same values");
    to.spec.replicas = Some(6);
    assert_ne!(diff(&from, &to), "", "replicas differ");
    to.spec.replicas = Some(5);
    to.spec.min_ready_seconds = 500;
    assert_ne!(diff(&from, &to), "", "min ready seconds differ");
    to.spec.min_ready_seconds = 0;

    let from_container = Container {
        name: s("bar"),
        ..Container::default()
    };
    from.spec.template.spec.containers = vec![from_container];
    assert_eq!(diff(&from, &to), "", "containers only in reference");
    to.spec.template.spec.containers = vec![];
    assert_eq!(diff(&from, &to), "", "empty candidate containers");

    let mut to_container = Container {
        name: s("bar"),
        ..Container::default()
    };
    to.spec.template.spec.containers = vec![to_container.clone()];
    assert_eq!(diff(&from, &to), "", "same container");
    to_container.name = s("bar1");
    to.spec.template.spec.containers = vec![to_container.clone()];
    assert_ne!(diff(&from, &to), "", "container renamed");
    to_container.name = s("bar");
    to.spec.template.spec.containers = vec![to_container.clone(), to_container.clone()];
    assert_ne!(diff(&from, &to), "", "extra container");

    // one level deeper, into env vars
    from.spec.template.spec.containers = vec![Container {
        env: vec![env("sanitize", "bar")],
        ..Container::default()
    }];
    to.spec.template.spec.containers = vec![Container::default()];
    assert_eq!(diff(&from, &to), "", "env only in reference");

    to.spec.template.spec.containers = vec![Container {
        env: vec![env("sanitize", "bar")],
        ..Container::default()
    }];
    assert_eq!(diff(&from, &to), "", "same env");
    to.spec.template.spec.containers = vec![Container {
        env: vec![env("sanitize", "bar1")],
        ..Container::default()
    }];
    assert_ne!(diff(&from, &to), "", "env value changed");
    to.spec.template.spec.containers = vec![Container {
        env: vec![env("sanitize", "bar"), env("foo1", "bar1")],
        ..Container::default()
    }];
    assert_ne!(diff(&from, &to), "", "extra env var");
}

#[test]
fn test_comparison_reports_stats() {
    let reference = X {
        string_slice: strings(&["foo1", "foo2", "foo3"]),
        string1: s("ignored"),
        ..X::default()
    };
    let candidate = X {
        string_slice: strings(&["foo1", "bar"]),
        ..X::default()
    };
    let comparison = Comparison {
        reference: &reference,
        candidate: &candidate,
    };
    let stats = comparison.stats();
    assert_eq!(stats.changed, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.identical, 1);
    assert_eq!(stats.ignored, 12);
    assert_eq!(stats.differences(), 2);
    assert!(!comparison.is_equal());
}

#[test]
fn test_repeated_calls_are_byte_identical() {
    let ymap: HashMap<String, Y> = (0..20)
        .map(|i| (format!("key{}", i), y(&format!("v{}", i), i + 1)))
        .collect();
    let mut changed = ymap.clone();
    for value in changed.values_mut() {
        value.int += 100;
    }
    let reference = X {
        y_map: ymap,
        ..X::default()
    };
    let candidate = X {
        y_map: changed,
        ..X::default()
    };
    let first = diff(&reference, &candidate);
    for _ in 0..5 {
        assert_eq!(diff(&reference, &candidate), first);
    }
}

#[test]
fn test_large_integers_are_not_rounded_through_floats() {
    let exact = json!(9_007_199_254_740_993u64);
    let rounded: serde_json::Value = serde_json::from_str("9007199254740992.0").unwrap();
    assert_ne!(diff(&exact, &rounded), "");
    assert_ne!(diff(&rounded, &exact), "");

    let negative = json!(-9_007_199_254_740_993i64);
    let negative_rounded: serde_json::Value =
        serde_json::from_str("-9007199254740992.0").unwrap();
    assert_ne!(diff(&negative, &negative_rounded), "");

    let two: serde_json::Value = serde_json::from_str("2.0").unwrap();
    assert_eq!(diff(&json!(2), &two), "");
}

#[test]
fn test_concurrent_calls_share_inputs_and_agree() {
    let mut live = Deployment::default();
    live.metadata.name = s("web");
    live.metadata.labels = string_map(&[("app", "web"), ("tier", "frontend")]);
    live.spec.replicas = Some(3);
    live.spec.template.spec.containers = vec![Container {
        name: s("web"),
        image: s("nginx:1.25"),
        env: vec![env("MODE", "live"), env("LEVEL", "info")],
    }];
    let mut desired = live.clone();
    desired.spec.replicas = Some(5);
    desired.spec.template.spec.containers[0].env = vec![env("MODE", "desired")];

    let reference = Arc::new(live);
    let candidate = Arc::new(desired);
    let expected = diff(&*reference, &*candidate);
    assert!(!expected.is_empty());

    let reports: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reference = Arc::clone(&reference);
                let candidate = Arc::clone(&candidate);
                scope.spawn(move || diff(&*reference, &*candidate))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(reports.len(), 8);
    for report in reports {
        assert_eq!(report, expected);
    }
}
