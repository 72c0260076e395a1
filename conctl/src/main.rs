use clap::{Parser, Subcommand};
use dotenv::dotenv;

use common::config::ServiceCenterConfig;
use common::service_register_center::Registry;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "conctl", version, about = "Search and delete consul services")]
struct Cli {
    /// Consul URL to use. Default: http://localhost:8500 or $CONSUL_URL if set
    #[arg(short = 'c', long = "consul-url", global = true)]
    consul_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all service names. Use 'list-filtered' to get full service information.
    ListServices,
    /// List all tags used in all services.
    ListTags,
    /// Print full information about a single service.
    ServiceInfo {
        /// Name of the service to inspect
        service_name: String,
    },
    /// Delete all services with a given ID. The ID must match exactly.
    DelById {
        /// ID of the service to delete
        service_id: String,
    },
    /// Delete all services with a certain name. The name must match exactly.
    DelByName {
        /// Name of the service to delete
        service_name: String,
    },
    /// Delete all services which have a given tag. The tag must match exactly.
    DelByTag {
        /// Delete services with this tag
        tag_name: String,
    },
    /// List services based on filter criteria. Nested fields (e.g. ServiceTags) cannot be filtered.
    ListFiltered {
        /// Add service filter (-f FIELD=REGEX), may be repeated
        #[arg(short = 'f', long = "filter")]
        filter: Vec<String>,
        /// Output all service details, not only the service name
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Same as list-filtered, but deletes the services. A filter list is
    /// required to prevent accidentally deleting all services.
    DelFiltered {
        /// Add service filter (-f FIELD=REGEX), at least one is required
        #[arg(short = 'f', long = "filter", required = true)]
        filter: Vec<String>,
    },
    /// Print version and exit
    #[command(alias = "v")]
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::logging::init()?;

    let cli = Cli::parse();

    // 配置优先级：命令行参数 > CONSUL_URL环境变量 > 内置默认值
    let config = ServiceCenterConfig::load(cli.consul_url)?;
    let mut registry = Registry::new(config.url, config.timeout);

    match cli.command {
        Commands::ListServices => commands::list_services(&mut registry).await?,
        Commands::ListTags => commands::list_tags(&mut registry).await?,
        Commands::ServiceInfo { service_name } => {
            commands::service_info(&mut registry, &service_name).await?
        }
        Commands::DelById { service_id } => commands::del_by_id(&mut registry, &service_id).await?,
        Commands::DelByName { service_name } => {
            commands::del_by_name(&mut registry, &service_name).await?
        }
        Commands::DelByTag { tag_name } => commands::del_by_tag(&mut registry, &tag_name).await?,
        Commands::ListFiltered { filter, verbose } => {
            commands::list_filtered(&mut registry, &filter, verbose).await?
        }
        Commands::DelFiltered { filter } => commands::del_filtered(&mut registry, &filter).await?,
        Commands::Version => println!("{}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
