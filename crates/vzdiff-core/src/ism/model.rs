//! ISM policy document types.
//!
//! [`IsmPolicy`] mirrors the body returned by the OpenSearch
//! `_plugins/_ism/policies/<name>` endpoint; [`IndexManagementPolicy`] is
//! the configuration entry a desired policy is generated from.

use crate::diffable_record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored ISM policy with its concurrency metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsmPolicy {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "_primary_term",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_term: Option<i64>,
    #[serde(rename = "_seq_no", default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    /// HTTP status of the fetch that produced this value, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub policy: InlinePolicy,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InlinePolicy {
    pub default_state: String,
    pub description: String,
    pub states: Vec<PolicyState>,
    pub ism_template: Vec<IsmTemplate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsmTemplate {
    #[serde(default)]
    pub index_patterns: Vec<String>,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyState {
    pub name: String,
    /// Each action is a single-key object such as `{"rollover": {...}}`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<PolicyTransition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyTransition {
    pub state_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<PolicyConditions>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConditions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub min_index_age: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub min_rollover_age: String,
}

/// Response body of the policy listing endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyList {
    #[serde(default)]
    pub policies: Vec<IsmPolicy>,
    #[serde(default)]
    pub total_policies: u64,
}

/// Configured index lifecycle policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexManagementPolicy {
    pub policy_name: String,
    pub index_pattern: String,
    /// Age after which managed indices are deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_index_age: Option<String>,
    #[serde(default)]
    pub rollover: RolloverPolicy,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_index_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_doc_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<String>,
}

diffable_record!(IsmPolicy {
    id,
    primary_term,
    seq_no,
    status,
    policy
});
diffable_record!(InlinePolicy {
    default_state,
    description,
    states,
    ism_template
});
diffable_record!(IsmTemplate {
    index_patterns,
    priority
});
diffable_record!(PolicyState {
    name,
    actions,
    transitions
});
diffable_record!(PolicyTransition {
    state_name,
    conditions
});
diffable_record!(PolicyConditions {
    min_index_age,
    min_rollover_age
});
