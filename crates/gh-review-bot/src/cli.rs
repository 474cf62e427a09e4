use clap::{Parser, Subcommand};
use gh_review_config::ConfigOverrides;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    #[clap(about = "request reviews from the author's required reviewers")]
    AssignReviewers,
    #[clap(about = "request reviews on every open pull request, including ones from forks")]
    AssignExternal,
    #[clap(about = "check that every required reviewer approved the current head")]
    CheckReviewers,
    #[clap(about = "delete stale check workflow runs on every open pull request")]
    DismissRuns,
}

#[derive(Parser, Debug)]
#[command(name = "gh-review-bot", version, about = "Pull request review governance bot")]
pub struct Args {
    #[arg(long, global = true, help = "GitHub token; falls back to GITHUB_TOKEN, GH_TOKEN or `gh auth token`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "reviewer assignments as a JSON object of author to reviewers")]
    pub reviewers: Option<String>,

    #[arg(long, global = true, help = "reviewers for authors without an assignment, JSON array or comma-separated")]
    pub default_reviewers: Option<String>,

    #[arg(long, global = true, help = "name of the workflow whose stale runs are deleted")]
    pub check_workflow: Option<String>,

    #[arg(long, global = true, value_name = "SECONDS", help = "deadline for the whole invocation")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            reviewers: self.reviewers.clone(),
            default_reviewers: self.default_reviewers.clone(),
            check_workflow: self.check_workflow.clone(),
            timeout_secs: self.timeout,
        }
    }
}
