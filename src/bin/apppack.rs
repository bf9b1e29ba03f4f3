use anyhow::{Context, Result, bail};
use apppack::config::ConfigLoader;
use apppack::container::{ContainerReference, image_tag};
use apppack::entrypoint::Entrypoint;
use apppack::logging;
use apppack::pipeline::Generator;
use apppack::repo::{GitRepository, IdentityOverrides, RepoIdentity};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None, after_long_help = env_help())]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the CWL application package and descriptor for a repository
    Generate(GenerateArgs),

    /// Print the parameters an entrypoint declares and their roles
    Inspect {
        /// Local checkout of the algorithm repository
        #[arg(long)]
        repo: PathBuf,

        /// Entrypoint relative to the repository root (default: process.ipynb)
        #[arg(long)]
        entrypoint: Option<PathBuf>,

        /// Generator config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Local checkout of the algorithm repository
    #[arg(long)]
    repo: PathBuf,

    /// Entrypoint relative to the repository root (default: process.ipynb)
    #[arg(long)]
    entrypoint: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(long)]
    out: PathBuf,

    /// Full container image reference produced by the image build
    #[arg(long, conflicts_with_all = ["namespace", "repository", "tag"])]
    container_ref: Option<String>,

    /// Registry namespace of the container image
    #[arg(long)]
    namespace: Option<String>,

    /// Registry repository of the container image
    #[arg(long)]
    repository: Option<String>,

    /// Image tag (default: owner.name.commit)
    #[arg(long)]
    tag: Option<String>,

    /// Repository owner (default: parsed from the origin remote)
    #[arg(long)]
    owner: Option<String>,

    /// Repository name (default: parsed from the origin remote)
    #[arg(long)]
    name: Option<String>,

    /// Commit short id (default: HEAD)
    #[arg(long)]
    commit: Option<String>,

    /// Commit message used as the process title (default: HEAD message)
    #[arg(long)]
    message: Option<String>,

    /// Generator config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template directory, overriding the config
    #[arg(long)]
    templates: Option<PathBuf>,
}

fn env_help() -> String {
    let mut help = String::from("Environment:\n");
    for line in ConfigLoader::env_var_documentation() {
        help.push_str("  ");
        help.push_str(line);
        help.push('\n');
    }
    help
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Inspect {
            repo,
            entrypoint,
            config,
        } => inspect(&repo, entrypoint.as_deref(), config.as_deref()),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    if let Some(templates) = args.templates.clone() {
        config.templates_dir = Some(templates);
    }
    let generator = Generator::from_config(&config)?;

    let identity = resolve_identity(&args)?;
    let container_ref = resolve_container_ref(&args, &identity)?;
    info!(process_id = %identity.process_id(), container = %container_ref, "Generating application package");

    let entrypoint = Entrypoint::resolve(&args.repo, args.entrypoint.as_deref())?;
    let params = generator.parameters_for(&args.repo, &entrypoint)?;
    let package = generator.generate(&entrypoint, &params, &identity, &container_ref)?;

    for path in package.write_to(&args.out)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn inspect(repo: &Path, entrypoint: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config)?;
    let generator = Generator::from_config(&config)?;
    let entrypoint = Entrypoint::resolve(repo, entrypoint)?;
    let params = generator
        .parameters_for(repo, &entrypoint)
        .with_context(|| format!("Failed to inspect {}", entrypoint))?;

    println!("{}", entrypoint);
    println!("{}", params.summary());
    println!(
        "stage-in: {}",
        params.stage_in().map(|p| p.name()).unwrap_or("-")
    );
    println!(
        "stage-out: {}",
        params.stage_out().map(|p| p.name()).unwrap_or("-")
    );
    Ok(())
}

fn resolve_identity(args: &GenerateArgs) -> Result<RepoIdentity> {
    let overrides = IdentityOverrides {
        owner: args.owner.clone(),
        name: args.name.clone(),
        commit_short_id: args.commit.clone(),
        commit_message: args.message.clone(),
    };
    let repo = GitRepository::open(&args.repo);
    repo.resolve_identity(&overrides).with_context(|| {
        format!(
            "Failed to read repository facts from {}",
            repo.directory().display()
        )
    })
}

fn resolve_container_ref(args: &GenerateArgs, identity: &RepoIdentity) -> Result<String> {
    if let Some(reference) = &args.container_ref {
        reference.parse::<ContainerReference>()?;
        return Ok(reference.clone());
    }
    let Some(repository) = &args.repository else {
        bail!("either --container-ref or --repository is required");
    };
    let tag = args.tag.clone().unwrap_or_else(|| {
        image_tag(
            identity.owner.as_deref(),
            &identity.name,
            &identity.commit_short_id,
        )
    });
    let reference = ContainerReference::new(args.namespace.as_deref(), repository, Some(&tag));
    Ok(reference.to_string())
}
