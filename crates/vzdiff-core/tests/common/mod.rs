//! Shared fixture types for vzdiff-core integration tests.
//!
//! `X`, `Y` and `Z` cover every value kind the engine understands; the
//! `Deployment` family mimics the shape of a Kubernetes workload.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use vzdiff_core::diff::diff;
use vzdiff_core::diffable_record;

#[derive(Debug, Clone, Default)]
pub struct X {
    pub string1: String,
    pub string2: String,
    pub string3: Option<String>,
    pub int1: i64,
    pub int2: Option<i64>,
    pub int32: i32,
    pub int64: Option<i64>,
    pub string_slice: Vec<String>,
    pub y_slice1: Vec<Y>,
    pub y_slice2: Vec<Rc<Y>>,
    pub string_map: BTreeMap<String, String>,
    pub y_map: HashMap<String, Y>,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Y {
    pub string: String,
    pub int: i64,
    pub string_slice: Vec<String>,
    pub z_slice: Vec<Z>,
    pub z_map: BTreeMap<String, Z>,
}

#[derive(Debug, Clone, Default)]
pub struct Z {
    pub string: String,
    pub int: i64,
    pub time: DateTime<Utc>,
}

diffable_record!(X {
    string1,
    string2,
    string3,
    int1,
    int2,
    int32,
    int64,
    string_slice,
    y_slice1,
    y_slice2,
    string_map,
    y_map,
    time,
});
diffable_record!(Y {
    string,
    int,
    string_slice,
    z_slice,
    z_map,
});
diffable_record!(Z { string, int, time });

#[derive(Debug, Clone, Default)]
pub struct Deployment {
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentSpec {
    pub replicas: Option<i32>,
    pub min_ready_seconds: i32,
    pub paused: bool,
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default)]
pub struct PodTemplateSpec {
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Default)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

diffable_record!(Deployment { metadata, spec });
diffable_record!(ObjectMeta {
    name,
    namespace,
    labels
});
diffable_record!(DeploymentSpec {
    replicas,
    min_ready_seconds,
    paused,
    template
});
diffable_record!(PodTemplateSpec { spec });
diffable_record!(PodSpec { containers });
diffable_record!(Container { name, image, env });
diffable_record!(EnvVar { name, value });

pub fn s(value: &str) -> String {
    value.to_string()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn y(string: &str, int: i64) -> Y {
    Y {
        string: s(string),
        int,
        ..Y::default()
    }
}

pub fn env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: s(name),
        value: s(value),
    }
}

/// Assert whether `diff(reference, candidate)` reports anything.
pub fn verify_diff(reference: &X, candidate: &X, expect_diffs: bool, description: &str) {
    let report = diff(reference, candidate);
    if expect_diffs {
        assert!(!report.is_empty(), "{}: expected a diff", description);
    } else {
        assert!(report.is_empty(), "{}: unexpected diff\n{}", description, report);
    }
}
