//! Desired-policy generation and update decisions.

use crate::diff::diff;
use crate::errors::{VzDiffError, VzError, VzErrorKind};
use crate::ism::model::{
    IndexManagementPolicy, InlinePolicy, IsmPolicy, IsmTemplate, PolicyConditions, PolicyList,
    PolicyState, PolicyTransition, RolloverPolicy,
};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

/// Description marking a policy as owned by the operator
pub const OPERATOR_MANAGED_POLICY: &str = "Verrazzano-managed";

/// Default age before a managed index is deleted
pub const DEFAULT_MIN_INDEX_AGE: &str = "7d";

/// Default age before a managed index is rolled over
pub const DEFAULT_ROLLOVER_INDEX_AGE: &str = "1d";

/// Default policy covering system indices
pub const SYSTEM_DEFAULT_POLICY: &str = "vz-system";

/// Default policy covering application indices
pub const APPLICATION_DEFAULT_POLICY: &str = "vz-application";

/// Default policy names and the files they are loaded from.
pub const DEFAULT_POLICIES: [(&str, &str); 2] = [
    (SYSTEM_DEFAULT_POLICY, "vz-system-default-ISM-policy.json"),
    (APPLICATION_DEFAULT_POLICY, "vz-application-default-ISM-policy.json"),
];

const INGEST_STATE: &str = "ingest";
const DELETE_STATE: &str = "delete";

/// What the reconciler has to do to bring a stored policy up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyUpdate {
    /// Stored policy already matches
    Unchanged,
    /// No policy is stored under this name
    Create,
    /// Replace the stored policy, guarded by its sequence number and primary term
    Update { seq_no: i64, primary_term: i64 },
}

fn rollover_action(rollover: &RolloverPolicy) -> Map<String, Value> {
    let mut action = Map::new();
    if let Some(count) = rollover.min_doc_count {
        action.insert("min_doc_count".to_string(), json!(count));
    }
    if let Some(size) = &rollover.min_size {
        action.insert("min_size".to_string(), json!(size));
    }
    let min_index_age = rollover
        .min_index_age
        .as_deref()
        .unwrap_or(DEFAULT_ROLLOVER_INDEX_AGE);
    action.insert("min_index_age".to_string(), json!(min_index_age));
    action
}

/// Build the desired ISM policy for a configured index lifecycle.
///
/// The policy has an `ingest` state that rolls indices over and moves them
/// to `delete` once they reach the configured minimum age.
pub fn to_ism_policy(policy: &IndexManagementPolicy) -> IsmPolicy {
    let mut rollover = Map::new();
    rollover.insert(
        "rollover".to_string(),
        Value::Object(rollover_action(&policy.rollover)),
    );
    let mut delete = Map::new();
    delete.insert("delete".to_string(), json!({}));

    let min_index_age = policy
        .min_index_age
        .clone()
        .unwrap_or_else(|| DEFAULT_MIN_INDEX_AGE.to_string());

    IsmPolicy {
        policy: InlinePolicy {
            default_state: INGEST_STATE.to_string(),
            description: OPERATOR_MANAGED_POLICY.to_string(),
            ism_template: vec![IsmTemplate {
                index_patterns: vec![policy.index_pattern.clone()],
                priority: 1,
            }],
            states: vec![
                PolicyState {
                    name: INGEST_STATE.to_string(),
                    actions: vec![rollover],
                    transitions: vec![PolicyTransition {
                        state_name: DELETE_STATE.to_string(),
                        conditions: Some(PolicyConditions {
                            min_index_age,
                            min_rollover_age: String::new(),
                        }),
                    }],
                },
                PolicyState {
                    name: DELETE_STATE.to_string(),
                    actions: vec![delete],
                    transitions: vec![],
                },
            ],
        },
        ..IsmPolicy::default()
    }
}

/// Decide whether the stored policy must be replaced by the desired one.
///
/// Default state and description are compared exactly. States and index
/// templates are compared semantically with `existing` as the candidate
/// side, so fields the stored document leaves unset never force an update.
pub fn policy_needs_update(desired: &IsmPolicy, existing: &IsmPolicy) -> bool {
    let start = Instant::now();
    let name = desired
        .id
        .as_deref()
        .or(existing.id.as_deref())
        .unwrap_or_default();
    log_op_start!("policy_needs_update", policy_name = name);

    let new_doc = &desired.policy;
    let old_doc = &existing.policy;
    let states_diff = diff(&new_doc.states, &old_doc.states);
    let template_diff = diff(&new_doc.ism_template, &old_doc.ism_template);

    let needs_update = new_doc.default_state != old_doc.default_state
        || new_doc.description != old_doc.description
        || !states_diff.is_empty()
        || !template_diff.is_empty();

    let diff_lines = states_diff.lines().count() + template_diff.lines().count();
    if !states_diff.is_empty() {
        tracing::debug!(policy_name = name, "ISM policy states drifted:\n{}", states_diff);
    }
    log_op_end!(
        "policy_needs_update",
        duration_ms = start.elapsed().as_millis() as u64,
        policy_name = name,
        needs_update = needs_update,
        diff_lines = diff_lines as u64
    );
    needs_update
}

/// Plan the write needed to reconcile `existing` towards `desired`.
///
/// `existing.status` carries the HTTP status of the fetch: 200 when a policy
/// is stored, 404 when none is.
///
/// # Errors
///
/// - `InvalidPolicy` when an update is needed but the fetch status is
///   neither 200 nor 404, or a stored policy lacks its sequence number or
///   primary term
pub fn plan_policy_update(
    desired: &IsmPolicy,
    existing: &IsmPolicy,
) -> Result<PolicyUpdate, VzError> {
    if !policy_needs_update(desired, existing) {
        return Ok(PolicyUpdate::Unchanged);
    }
    let name = desired.id.as_deref().unwrap_or_default();
    match existing.status {
        Some(200) => match (existing.seq_no, existing.primary_term) {
            (Some(seq_no), Some(primary_term)) => Ok(PolicyUpdate::Update {
                seq_no,
                primary_term,
            }),
            _ => Err(VzError::new(VzErrorKind::InvalidPolicy)
                .with_op("plan_policy_update")
                .with_message(format!(
                    "stored ISM policy {} has no sequence number or primary term",
                    name
                ))),
        },
        Some(404) => Ok(PolicyUpdate::Create),
        status => Err(VzError::new(VzErrorKind::InvalidPolicy)
            .with_op("plan_policy_update")
            .with_message(format!(
                "invalid status when fetching ISM policy {}: {:?}",
                name, status
            ))),
    }
}

/// True when a stored policy is operator-managed but no longer configured.
///
/// A policy without an id cannot be addressed for deletion and is never
/// eligible.
pub fn is_eligible_for_deletion(policy: &IsmPolicy, expected: &BTreeSet<String>) -> bool {
    policy.policy.description == OPERATOR_MANAGED_POLICY
        && policy.id.as_ref().is_some_and(|id| !expected.contains(id))
}

/// Ids of stored policies that should be deleted given the configured set.
pub fn policies_to_delete(list: &PolicyList, configured: &[IndexManagementPolicy]) -> Vec<String> {
    let expected: BTreeSet<String> = configured.iter().map(|p| p.policy_name.clone()).collect();
    list.policies
        .iter()
        .filter(|p| is_eligible_for_deletion(p, &expected))
        .filter_map(|p| p.id.clone())
        .collect()
}

/// True when a policy other than `name` already covers what `search` would.
///
/// A stored policy takes over from a default one when its first ISM
/// template has the same priority and shares at least one index pattern.
/// Policies without an id or without templates never match.
pub fn custom_policy_exists(search: &IsmPolicy, name: &str, policies: &[IsmPolicy]) -> bool {
    let Some(wanted) = search.policy.ism_template.first() else {
        return false;
    };
    let found = policies.iter().find(|policy| {
        policy.id.as_deref().is_some_and(|id| id != name)
            && policy.policy.ism_template.first().is_some_and(|template| {
                template.priority == wanted.priority
                    && index_patterns_overlap(&template.index_patterns, &wanted.index_patterns)
            })
    });
    if let Some(policy) = found {
        tracing::debug!(
            policy_name = name,
            custom_policy = policy.id.as_deref().unwrap_or_default(),
            "custom policy covers default policy"
        );
    }
    found.is_some()
}

fn index_patterns_overlap(existing: &[String], wanted: &[String]) -> bool {
    existing.iter().any(|pattern| wanted.contains(pattern))
}

/// Default policies that should be written, given the stored policies.
///
/// A default is skipped when a custom policy already covers its indices.
pub fn default_policies_to_apply<'a>(
    defaults: &'a [(String, IsmPolicy)],
    stored: &PolicyList,
) -> Vec<&'a (String, IsmPolicy)> {
    defaults
        .iter()
        .filter(|(name, policy)| !custom_policy_exists(policy, name, &stored.policies))
        .collect()
}

/// Load the default policies from the directory holding their files.
///
/// # Errors
///
/// - `Io` when a policy file cannot be read
/// - `InvalidPolicy` when a file is not a policy document
pub fn load_default_policies(dir: &Path) -> Result<Vec<(String, IsmPolicy)>, VzError> {
    let start = Instant::now();
    let dir_text = dir.display().to_string();
    log_op_start!("load_default_policies", policy_dir = %dir_text);

    let result = DEFAULT_POLICIES
        .iter()
        .map(|(name, file_name)| {
            let path = dir.join(file_name);
            let bytes = std::fs::read(&path).map_err(|e| {
                VzError::from(VzDiffError::DocumentRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
                .with_op("load_default_policies")
            })?;
            let policy = parse_policy_bytes(&bytes)
                .map_err(|e| e.with_path(path.display().to_string()))?;
            Ok((name.to_string(), policy))
        })
        .collect::<Result<Vec<_>, VzError>>();

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(policies) => {
            log_op_end!(
                "load_default_policies",
                duration_ms = duration_ms,
                policy_count = policies.len() as u64
            );
        }
        Err(e) => {
            log_op_error!("load_default_policies", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

/// Parse a policy document as returned by OpenSearch.
///
/// # Errors
///
/// - `InvalidPolicy` when the bytes are not a JSON policy document
pub fn parse_policy_bytes(bytes: &[u8]) -> Result<IsmPolicy, VzError> {
    serde_json::from_slice(bytes).map_err(|e| {
        VzError::from(VzDiffError::InvalidPolicy {
            reason: e.to_string(),
        })
        .with_op("parse_policy_bytes")
    })
}

/// Serialize a policy document as the request body for a policy write.
///
/// # Errors
///
/// - `Serialization` when JSON encoding fails
pub fn serialize_policy(policy: &IsmPolicy) -> Result<Vec<u8>, VzError> {
    serde_json::to_vec(policy)
        .map_err(|e| VzError::from(VzDiffError::from(e)).with_op("serialize_policy"))
}
