mod alias;
mod api_client;
mod dev_server;
mod error;
mod http_client;
mod proxy_service;
mod proxy_table;
mod server_config;
mod static_files;
mod std_logger;
#[cfg(test)]
mod test_support;

use std::io::{ErrorKind, Result};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;
use reqwest::Method;

use api_client::ApiClientConfig;
use http_client::HttpClientConfig;
use server_config::{DevServerConfig, HostSetting};

#[derive(Parser)]
#[command(name = "dev_proxy", version, about = "Development server with an API forwarding proxy")]
struct Cli {
    /// YAML file with dev server settings.
    #[arg(long, env = "DEV_SERVER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dev server (default).
    Serve(ServeArgs),
    /// Send one request through the API client and print the response.
    Fetch {
        #[arg(long, short = 'X', default_value = "GET")]
        method: String,
        path: String,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    #[arg(long)]
    port: Option<u16>,
    /// `true`, `false` or an address to listen on.
    #[arg(long)]
    host: Option<HostSetting>,
    /// Fail instead of trying the next port when the port is taken.
    #[arg(long)]
    strict_port: bool,
    #[arg(long)]
    workers: Option<usize>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    std_logger::init().map_err(|err| std::io::Error::new(ErrorKind::Other, err.to_string()))?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            let config = load_config(cli.config)?;
            serve(config, args).await
        }
        Command::Fetch { method, path } => fetch(&method, &path).await,
    }
}

fn load_config(path: Option<PathBuf>) -> Result<DevServerConfig> {
    match path {
        Some(path) => {
            info!("Loading dev server config from '{}'.", path.display());
            Ok(DevServerConfig::load_from_file(&path)?)
        }
        None => Ok(DevServerConfig::default()),
    }
}

async fn serve(mut config: DevServerConfig, args: ServeArgs) -> Result<()> {
    let ServeArgs {
        port,
        host,
        strict_port,
        workers,
    } = args;

    if let Some(port) = port {
        config.port = port;
    }

    if let Some(host) = host {
        config.host = host;
    }

    if strict_port {
        config.strict_port = true;
    }

    if let Some(workers) = workers {
        config.workers = workers;
    }

    dev_server::run(config, HttpClientConfig::from_env()).await?;
    Ok(())
}

async fn fetch(method: &str, path: &str) -> Result<()> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|err| std::io::Error::new(ErrorKind::InvalidInput, err))?;

    let client = ApiClientConfig::from_env()
        .to_client()
        .map_err(|err| std::io::Error::new(ErrorKind::Other, err))?;
    info!(
        "Requesting {} {} (base '{}', timeout {:?})",
        &method,
        client.url_for(path),
        client.base_url(),
        client.timeout()
    );

    let response = client
        .send(client.request(method, path))
        .await
        .map_err(|err| std::io::Error::new(ErrorKind::Other, err))?;

    println!("{}", response.status());
    for (name, value) in response.headers() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    let body = response
        .text()
        .await
        .map_err(|err| std::io::Error::new(ErrorKind::Other, err))?;
    println!();
    println!("{}", body);

    Ok(())
}
