//! gh-review-bot
//!
//! Runs as a GitHub Actions step. `assign-reviewers` and `check-reviewers`
//! act on the pull request of the triggering event; `assign-external` and
//! `dismiss-runs` run on a schedule over every open pull request of the
//! repository.
//!
//! Exit codes: 0 on success, 1 on any failure, 2 when the invocation was
//! cancelled by its deadline.

mod cli;

use clap::Parser;
use cli::{Args, Command};
use gh_client::{GitHubClient, OctocrabClient};
use gh_review_config::{load_event, BotConfig, TokenResolver};
use gh_review_core::{
    CheckContext, CheckOrchestrator, PullRequestMetadata, RepositoryPruner, ReviewGateError,
    ReviewerAssigner, ReviewerRegistry,
};
use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

const EXIT_CANCELLED: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let cancelled = e
                .downcast_ref::<ReviewGateError>()
                .is_some_and(ReviewGateError::is_cancelled);
            if cancelled {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = BotConfig::load(args.overrides())?;
    let token = TokenResolver::new(args.token.clone()).get_token().await?;
    let client: Arc<dyn GitHubClient> = Arc::new(OctocrabClient::from_token(token)?);
    let registry = ReviewerRegistry::new(config.reviewers.clone(), config.default_reviewers.clone());
    let ctx = CheckContext::with_timeout(config.timeout);

    match args.command {
        Command::AssignReviewers => {
            let pr = load_pull_request(&config)?;
            let requested = ReviewerAssigner::new(client, registry)
                .assign(&ctx, &pr)
                .await?;
            info!("Assigned {} to {}", requested.mentions(), pr);
        }
        Command::AssignExternal => {
            let repository = config.repository()?;
            let assigned = ReviewerAssigner::new(client, registry)
                .assign_all(&ctx, &repository.owner, &repository.name)
                .await?;
            info!(
                "{}: assigned reviewers on {} pull request(s)",
                repository,
                assigned.len()
            );
        }
        Command::CheckReviewers => {
            let pr = load_pull_request(&config)?;
            let outcome = CheckOrchestrator::new(
                client,
                registry,
                config.check_workflow.as_str(),
                config.bot_committer.as_str(),
            )
            .run(&ctx, &pr)
            .await?;
            info!("{}: check passed ({})", pr, outcome.state);
        }
        Command::DismissRuns => {
            let repository = config.repository()?;
            let reports = RepositoryPruner::new(client, config.check_workflow.as_str())
                .prune_all(&ctx, &repository.owner, &repository.name)
                .await?;
            let deleted: usize = reports.iter().map(|r| r.deleted.len()).sum();
            info!(
                "{}: deleted {} stale run(s) across {} branch(es)",
                repository,
                deleted,
                reports.len()
            );
        }
    }

    ctx.token().cancel();
    Ok(())
}

fn load_pull_request(config: &BotConfig) -> anyhow::Result<PullRequestMetadata> {
    let event = load_event(config.event_path()?)?;
    Ok(PullRequestMetadata::from_event(&event)?)
}
