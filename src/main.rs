// dlight command-line client.
// Fetches a GitHub user's data through the repository layer and prints each state.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use dlight::config::Overrides;
use dlight::{
    Config, Follow, GitHubClient, MemoryRepoCache, Repo, Resource, ResourceStream, User,
    UserRepository,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// GitHub token (defaults to GITHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// API base URL (defaults to DLIGHT_API_BASE or https://api.github.com)
    #[arg(long)]
    api_base: Option<String>,

    /// Cache directory (defaults to DLIGHT_CACHE_DIR or the platform cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep the repository cache in memory only
    #[arg(long)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a user's profile
    Profile { username: String },
    /// List a user's followers
    Followers { username: String },
    /// List accounts a user follows
    Following { username: String },
    /// List a user's repositories
    Repos { username: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let repository = match build_repository(&args) {
        Ok(repository) => repository,
        Err(err) => {
            error!(error = %err, "startup failed");
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let ok = match &args.command {
        Command::Profile { username } => {
            consume(repository.profile(username), print_profile).await
        }
        Command::Followers { username } => {
            consume(repository.followers(username), |f| print_follows(f)).await
        }
        Command::Following { username } => {
            consume(repository.following(username), |f| print_follows(f)).await
        }
        Command::Repos { username } => {
            consume(repository.repositories(username), |r| print_repos(r)).await
        }
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn build_repository(args: &Args) -> dlight::Result<UserRepository> {
    let config = Config::from_env()?.with_overrides(Overrides {
        token: args.token.clone(),
        api_base: args.api_base.clone(),
        cache_dir: args.cache_dir.clone(),
    })?;

    if args.no_cache {
        let source = GitHubClient::new(&config)?;
        return Ok(UserRepository::new(
            Arc::new(source),
            Arc::new(MemoryRepoCache::new()),
        ));
    }
    UserRepository::from_config(&config)
}

/// Drive a stream to its terminal value. Ctrl-C cancels the in-flight request.
async fn consume<T>(mut stream: ResourceStream<T>, render: impl Fn(&T)) -> bool {
    loop {
        let value = tokio::select! {
            value = stream.next() => value,
            _ = tokio::signal::ctrl_c() => {
                stream.cancel();
                info!("cancelled");
                return false;
            }
        };

        match value {
            Some(Resource::Loading) => eprintln!("Loading..."),
            Some(Resource::Success(data)) => {
                render(&data);
                return true;
            }
            Some(Resource::Error(message)) => {
                eprintln!("{}", message);
                return false;
            }
            None => return false,
        }
    }
}

fn print_profile(user: &User) {
    println!("{}", user.login);
    if let Some(name) = &user.name {
        println!("  name:      {}", name);
    }
    if let Some(bio) = &user.bio {
        println!("  bio:       {}", bio);
    }
    if let Some(location) = &user.location {
        println!("  location:  {}", location);
    }
    println!("  followers: {}", user.followers);
    println!("  following: {}", user.following);
    println!("  repos:     {}", user.public_repos);
    println!("  joined:    {}", user.created_at.format("%Y-%m-%d"));
    println!("  profile:   {}", user.html_url);
}

fn print_follows(follows: &[Follow]) {
    if follows.is_empty() {
        println!("(none)");
    }
    for follow in follows {
        println!("{} ({:?})", follow.login, follow.account_type);
    }
}

fn print_repos(repos: &[Repo]) {
    if repos.is_empty() {
        println!("(no repositories)");
    }
    for repo in repos {
        println!(
            "{}  * {}  forks {}  issues {}  {}",
            repo.full_name,
            repo.stargazers_count,
            repo.forks_count,
            repo.open_issues_count,
            repo.language.as_deref().unwrap_or("-"),
        );
        if let Some(description) = &repo.description {
            println!("    {}", description);
        }
    }
}
