//! ISM policy commands
//!
//! Usage:
//!   vzdiff policy plan --config <FILE> [--stored <FILE>] [--print-policy]
//!   vzdiff policy cleanup --config <FILE> --stored-list <FILE>
//!   vzdiff policy defaults --policy-dir <DIR> --stored-list <FILE>

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use vzdiff_core::document::{load_document, DocumentFormat};
use vzdiff_core::errors::{VzDiffError, VzError};
use vzdiff_core::ism::{
    default_policies_to_apply, load_default_policies, parse_policy_bytes, plan_policy_update,
    policies_to_delete, serialize_policy, to_ism_policy, IndexManagementPolicy, IsmPolicy,
    PolicyList, PolicyUpdate,
};

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Decide how a stored policy must change to match its configuration
    Plan(PlanArgs),
    /// List operator-managed policies that are no longer configured
    Cleanup(CleanupArgs),
    /// List default policies not already covered by a custom policy
    Defaults(DefaultsArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Configured index management policy (JSON or YAML)
    #[arg(long)]
    pub config: PathBuf,

    /// Stored policy as returned by OpenSearch; omit when none exists
    #[arg(long)]
    pub stored: Option<PathBuf>,

    /// Also print the desired policy document
    #[arg(long)]
    pub print_policy: bool,
}

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// List of configured index management policies (JSON or YAML)
    #[arg(long)]
    pub config: PathBuf,

    /// Policy listing as returned by OpenSearch
    #[arg(long)]
    pub stored_list: PathBuf,
}

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Directory holding the default policy files
    #[arg(long)]
    pub policy_dir: PathBuf,

    /// Policy listing as returned by OpenSearch
    #[arg(long)]
    pub stored_list: PathBuf,
}

pub fn execute(args: PolicyArgs) -> Result<i32, Box<dyn std::error::Error>> {
    match args.command {
        PolicyCommand::Plan(plan_args) => execute_plan(plan_args),
        PolicyCommand::Cleanup(cleanup_args) => execute_cleanup(cleanup_args),
        PolicyCommand::Defaults(defaults_args) => execute_defaults(defaults_args),
    }
}

fn execute_plan(args: PlanArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let configured: IndexManagementPolicy = load_typed(&args.config)?;
    let desired = IsmPolicy {
        id: Some(configured.policy_name.clone()),
        ..to_ism_policy(&configured)
    };

    let existing = match &args.stored {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                VzError::from(VzDiffError::DocumentRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            })?;
            let mut stored = parse_policy_bytes(&bytes)?;
            stored.status.get_or_insert(200);
            stored
        }
        None => IsmPolicy {
            status: Some(404),
            ..IsmPolicy::default()
        },
    };

    match plan_policy_update(&desired, &existing)? {
        PolicyUpdate::Unchanged => println!("unchanged"),
        PolicyUpdate::Create => println!("create {}", configured.policy_name),
        PolicyUpdate::Update {
            seq_no,
            primary_term,
        } => println!(
            "update {} if_seq_no={} if_primary_term={}",
            configured.policy_name, seq_no, primary_term
        ),
    }

    if args.print_policy {
        let body = serialize_policy(&desired)?;
        println!("{}", String::from_utf8_lossy(&body));
    }
    Ok(0)
}

fn execute_cleanup(args: CleanupArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let configured: Vec<IndexManagementPolicy> = load_typed(&args.config)?;
    let stored: PolicyList = load_typed(&args.stored_list)?;

    for id in policies_to_delete(&stored, &configured) {
        println!("{}", id);
    }
    Ok(0)
}

fn execute_defaults(args: DefaultsArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let defaults = load_default_policies(&args.policy_dir)?;
    let stored: PolicyList = load_typed(&args.stored_list)?;

    for (name, _) in default_policies_to_apply(&defaults, &stored) {
        println!("{}", name);
    }
    Ok(0)
}

fn load_typed<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, VzError> {
    let value = load_document(path, DocumentFormat::Auto)?;
    serde_json::from_value(value).map_err(|e| {
        VzError::from(VzDiffError::InvalidPolicy {
            reason: e.to_string(),
        })
        .with_path(path.display().to_string())
    })
}
