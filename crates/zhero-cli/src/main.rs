mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zhero_core::config::LogConfig;
use zhero_core::vocab::Namespace;
use zhero_core::{Config, GraphLoader, HierarchyBuilder, Resolver};

#[derive(Parser)]
#[command(name = "zhero")]
#[command(about = "Schema-driven content management over the Schema.org vocabulary", long_about = None)]
struct Cli {
    /// Config file to use instead of zhero.toml / the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vocabulary classes
    Classes {
        /// Only classes whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List the direct subclasses of a class
    Subclasses {
        /// Class name, e.g. CreativeWork
        class: String,
    },
    /// Show a class with its inherited properties (JSON)
    Class {
        /// Class name, e.g. BlogPosting
        name: String,
    },
    /// Print the class tree
    Hierarchy,
    /// Show the path from Thing to a class
    Breadcrumbs {
        /// Class name
        name: String,
    },
    /// Download the vocabulary again
    Fetch,
    /// Print the default configuration
    Config,
    /// Start the admin and public servers
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", Config::default_config_string());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.log);

    match cli.command {
        Commands::Fetch => {
            let loader = GraphLoader::from_config(&config.vocab).with_overwrite(true);
            let graph = loader.load().await?;
            println!(
                "Downloaded {} ({} triples)",
                loader.file().display(),
                graph.len()
            );
        }
        Commands::Classes { search } => {
            let resolver = load_resolver(&config).await?;
            let classes = match search {
                Some(q) => resolver.search_classes(&q),
                None => resolver.all_classes(),
            };
            for class in classes {
                println!("{}", class);
            }
        }
        Commands::Subclasses { class } => {
            let resolver = load_resolver(&config).await?;
            for sub in resolver.sub_classes_of(&resolver.class_term(&class)) {
                println!("{}", sub);
            }
        }
        Commands::Class { name } => {
            let resolver = load_resolver(&config).await?;
            let class = resolver.schema_class_by_name(&name)?;
            println!("{}", serde_json::to_string_pretty(&class)?);
        }
        Commands::Hierarchy => {
            let hierarchy = HierarchyBuilder::new(load_resolver(&config).await?);
            for path in hierarchy.class_hierarchy() {
                if let Some(name) = path.last() {
                    println!("{}{}", "  ".repeat(path.len() - 1), name);
                }
            }
        }
        Commands::Breadcrumbs { name } => {
            let hierarchy = HierarchyBuilder::new(load_resolver(&config).await?);
            let path = hierarchy
                .breadcrumbs_for(&name)
                .ok_or_else(|| eyre!("Class {} is not in the hierarchy", name))?;
            println!("{}", path.join(" > "));
        }
        Commands::Serve => {
            let resolver = load_resolver(&config).await?;
            serve::start_servers(&config, resolver).await?;
        }
        Commands::Config => {}
    }

    Ok(())
}

/// Load the vocabulary graph and build a resolver for the configured namespace.
async fn load_resolver(config: &Config) -> Result<Arc<Resolver>> {
    let loader = GraphLoader::from_config(&config.vocab);
    let namespace = Namespace::new(&config.vocab.namespace);
    let resolver = Resolver::load(&loader, namespace).await?;
    Ok(Arc::new(resolver))
}

/// Install the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if log.is_json() {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}
