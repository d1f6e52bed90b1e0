use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use redis_sync::reconcile::InteractivePrompt;
use redis_sync::workflow;
use redis_sync::{GitRepository, RedisStore, SyncContext, SyncError, SyncOptions, Workspace};

mod logging;

#[derive(Parser)]
#[command(name = "redis-sync")]
#[command(version)]
#[command(about = "Sync a git-versioned directory of JSON documents with Redis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the current directory as a sync workspace
    Init {
        /// Sync token to use instead of a generated one
        #[arg(long)]
        token: Option<String>,
    },

    /// Publish committed local data to Redis
    Push(PushArgs),

    /// Bring Redis data into the workspace
    Pull(SyncArgs),

    /// Commit all workspace changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show the working tree status
    Status,

    /// Show uncommitted changes
    Diff,
}

#[derive(Args)]
struct SyncArgs {
    /// Config file, defaults to redis_sync.conf in the workspace
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite differing values without asking
    #[arg(short, long)]
    overwrite: bool,

    /// Skip items that fail to read or write instead of aborting
    #[arg(short = 'c', long = "continue", visible_alias = "contine")]
    continue_on_error: bool,

    /// Sync token to use instead of the workspace token
    #[arg(long)]
    token: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl SyncArgs {
    fn options(&self) -> SyncOptions {
        SyncOptions {
            overwrite: self.overwrite,
            continue_on_error: self.continue_on_error,
            prune: false,
            token: self.token.clone(),
        }
    }
}

#[derive(Args)]
struct PushArgs {
    #[command(flatten)]
    sync: SyncArgs,

    /// Delete remote keys and fields missing locally
    #[arg(long)]
    prune: bool,
}

impl PushArgs {
    fn options(&self) -> SyncOptions {
        SyncOptions {
            prune: self.prune,
            ..self.sync.options()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Push(args) => args.sync.verbose,
        Commands::Pull(args) => args.verbose,
        _ => false,
    };
    logging::init_logging(verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e.render());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SyncError> {
    let workspace = Workspace::current()?;
    let repository = GitRepository::new(workspace.root());

    match cli.command {
        Commands::Init { token } => {
            let report = workflow::init(&workspace, token.as_deref(), &repository)?;
            println!("Initialized sync workspace, token: {}", report.token);
        }
        Commands::Push(args) => {
            let ctx = SyncContext::load(workspace, args.sync.config.as_deref(), args.options())?;
            if args.prune {
                log::info!("Remote keys missing locally will be deleted");
            }
            let mut remote = RedisStore::connect(&ctx.config.redis)?;
            let mut prompt = InteractivePrompt::stdio();
            let report = workflow::push(&ctx, &mut remote, &repository, &mut prompt)?;
            println!("{}", report.push_summary());
        }
        Commands::Pull(args) => {
            let ctx = SyncContext::load(workspace, args.config.as_deref(), args.options())?;
            let mut remote = RedisStore::connect(&ctx.config.redis)?;
            let mut prompt = InteractivePrompt::stdio();
            let report = workflow::pull(&ctx, &mut remote, &repository, &mut prompt)?;
            println!("{}", report.pull_summary());
        }
        Commands::Commit { message } => {
            let result = workflow::commit(&workspace, &repository, &message)?;
            match result.commit_hash {
                Some(hash) => println!("Committed {}", hash),
                None => println!("{}", result.message),
            }
        }
        Commands::Status => print!("{}", workflow::status(&workspace, &repository)?),
        Commands::Diff => print!("{}", workflow::diff(&workspace, &repository)?),
    }

    Ok(())
}
