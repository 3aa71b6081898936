mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use imagestore_core::config::Config;
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags win over the config file
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting imagestore");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Metadata store at {}", config.server.db_path.display());

    imagestore_server::start(config).await?;
    Ok(())
}

fn default_filter(verbose: bool, debug: bool) -> &'static str {
    if verbose {
        "imagestore=trace,imagestore_server=trace,imagestore_images=trace,imagestore_db=debug,imagestore_core=debug,tower_http=debug"
    } else if debug {
        "imagestore=debug,imagestore_server=debug,imagestore_images=debug,imagestore_db=info,tower_http=debug"
    } else {
        "imagestore=info,imagestore_server=info,imagestore_images=info,imagestore_db=info,tower_http=info"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config is read before logging starts so its debug flag can pick the
    // default filter. RUST_LOG overrides both.
    let debug = Config::load_or_default(cli.config.as_deref()).is_debug();
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| default_filter(cli.verbose, debug).to_string());

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("imagestore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Profile: {:?}", config.profile);
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Images: {}", config.storage.image_dir.display());
    println!("  Max upload: {} bytes", config.server.max_upload_bytes);

    let warnings = config.validate();
    for warning in &warnings {
        println!("  ! {warning}");
    }

    Ok(())
}
