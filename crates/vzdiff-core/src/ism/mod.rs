//! OpenSearch Index State Management (ISM) policies.
//!
//! Generates the desired policy for a configured index lifecycle and decides
//! whether a stored policy has drifted from it, using the semantic diff
//! engine. Default policies are skipped when a custom policy already covers
//! their indices. No HTTP client lives here; callers fetch and write documents.

pub mod model;
pub mod policy;

pub use model::{
    IndexManagementPolicy, InlinePolicy, IsmPolicy, IsmTemplate, PolicyConditions, PolicyList,
    PolicyState, PolicyTransition, RolloverPolicy,
};
pub use policy::{
    custom_policy_exists, default_policies_to_apply, is_eligible_for_deletion,
    load_default_policies, parse_policy_bytes, plan_policy_update, policies_to_delete,
    policy_needs_update, serialize_policy, to_ism_policy, PolicyUpdate,
    APPLICATION_DEFAULT_POLICY, DEFAULT_POLICIES, OPERATOR_MANAGED_POLICY, SYSTEM_DEFAULT_POLICY,
};
