use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::automation::{AutomationSettings, ProjectAutomationClient};
use crate::config;
use crate::github::gh_cli::GhCli;
use crate::model::project::Membership;
use crate::model::sync::{LabelOutcome, SprintAction, SyncReport};

/// Keep GitHub issues on their build project boards and in the current sprint.
#[derive(Debug, Parser)]
#[command(name = "buildboard", version)]
pub struct Cli {
    /// Config file (default: <config dir>/buildboard/config.toml)
    #[arg(long, global = true, env = "BUILDBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// More output; repeat for trace level
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Put the issue in the current sprint of every build project it is labelled for
    AddToSprint(IssueArgs),
    /// Clear the sprint on every build project the issue is on
    RemoveFromSprint(IssueArgs),
    /// Add the issue to the build project titled LABEL
    AddToBuildProject(BuildProjectArgs),
}

#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Repository as org/repo
    #[arg(long, value_parser = parse_repository)]
    pub repository: String,

    #[arg(long)]
    pub issue_number: u64,

    /// Organization owning the projects
    #[arg(long)]
    pub org: String,
}

#[derive(Debug, Args)]
pub struct BuildProjectArgs {
    #[command(flatten)]
    pub issue: IssueArgs,

    /// Build label, which is also the project title
    #[arg(long)]
    pub label: String,
}

fn parse_repository(s: &str) -> Result<String, String> {
    match s.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(s.to_string())
        }
        _ => Err(format!("expected org/repo, got '{s}'")),
    }
}

/// Run the parsed command. `Ok(false)` means the action reported failure.
pub async fn run(cli: Cli) -> Result<bool> {
    let config = config::load_config(cli.config.as_deref())?;
    let today = chrono::Local::now().date_naive();
    let client = ProjectAutomationClient::new(
        GhCli::new(config.gh_path.clone()),
        AutomationSettings::from_config(&config, today),
    );

    match cli.command {
        Command::AddToSprint(args) => sync_sprint(&client, &args, SprintAction::Add).await,
        Command::RemoveFromSprint(args) => sync_sprint(&client, &args, SprintAction::Remove).await,
        Command::AddToBuildProject(args) => {
            let issue = &args.issue;
            let membership = client
                .add_issue_to_build_project(
                    &issue.repository,
                    issue.issue_number,
                    &issue.org,
                    &args.label,
                )
                .await
                .with_context(|| {
                    format!(
                        "Failed to add {}#{} to {}",
                        issue.repository, issue.issue_number, args.label
                    )
                })?;
            match &membership {
                Some(Membership::Added(item)) => println!("Added to {}: {item}", args.label),
                Some(Membership::Existing(item)) => println!("Already in {}: {item}", args.label),
                None => println!("No project titled {} in {}", args.label, issue.org),
            }
            Ok(membership.is_some())
        }
    }
}

async fn sync_sprint(
    client: &ProjectAutomationClient<GhCli>,
    args: &IssueArgs,
    action: SprintAction,
) -> Result<bool> {
    let report = client
        .sync_sprint_for_all_build_labels(&args.repository, args.issue_number, &args.org, action)
        .await
        .with_context(|| {
            format!(
                "Sprint sync failed for {}#{}",
                args.repository, args.issue_number
            )
        })?;
    print_report(&report);
    Ok(report.succeeded())
}

fn describe(outcome: &LabelOutcome, action: SprintAction) -> String {
    match (outcome, action) {
        (LabelOutcome::Updated, SprintAction::Add) => "sprint set".into(),
        (LabelOutcome::Updated, SprintAction::Remove) => "sprint cleared".into(),
        (LabelOutcome::ProjectNotFound, _) => "no such project".into(),
        (LabelOutcome::NotInProject, _) => "issue not on project".into(),
        (LabelOutcome::IterationFailed(failure), _) => format!("failed: {failure}"),
    }
}

fn print_report(report: &SyncReport) {
    if report.outcomes.is_empty() {
        println!("No build labels");
        return;
    }
    for (label, outcome) in &report.outcomes {
        println!("  {label}: {}", describe(outcome, report.action));
    }
    println!(
        "Updated {} of {} build projects",
        report.updated(),
        report.outcomes.len()
    );
}
