use std::env;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workec_rs::{EcClient, EcConfig, Endpoint, Method, endpoints};

fn usage(program: &str) {
    eprintln!("Usage: {} <GET|POST> <path> [json_params]", program);
    eprintln!("       {} <endpoint> [json_params]", program);
    eprintln!("       {} endpoints", program);
    eprintln!("  path: relative to the API root (e.g., customer/rangeQueryCustomer)");
    eprintln!("  endpoint: catalog name or path (run `{} endpoints`)", program);
    eprintln!("  json_params: request body, default []");
    eprintln!("Credentials: WORKEC_CORP_ID, WORKEC_APP_ID, WORKEC_APP_SECRET");
    eprintln!("Optional: WORKEC_BASE_URL, WORKEC_TIMEOUT_SECS");
}

fn parse_params(raw: Option<&String>) -> Result<Value> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("json_params is not valid JSON"),
        None => Ok(endpoints::no_params()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the response body
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workec=info,workec_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("workec", String::as_str);
    let Some(command) = args.get(1) else {
        usage(program);
        std::process::exit(1);
    };

    if command == "endpoints" {
        for endpoint in Endpoint::ALL {
            println!(
                "{:<28} {:<5} {}",
                endpoint.name(),
                endpoint.method(),
                endpoint.path()
            );
        }
        return Ok(());
    }

    // Either `<METHOD> <path> [params]` or `<endpoint> [params]`
    let (method, path, raw_params) = if let Ok(method) = command.parse::<Method>() {
        let Some(path) = args.get(2) else {
            usage(program);
            std::process::exit(1);
        };
        (method, path.clone(), args.get(3))
    } else {
        match command.parse::<Endpoint>() {
            Ok(endpoint) => (endpoint.method(), endpoint.path().to_string(), args.get(2)),
            Err(e) => {
                eprintln!("Error: {}", e);
                usage(program);
                std::process::exit(1);
            }
        }
    };

    let params = match parse_params(raw_params) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let config = EcConfig::from_env();
    if config.credentials.app_id().is_empty() {
        tracing::warn!("WORKEC_APP_ID is not set, the platform will likely reject the signature");
    }

    let client = EcClient::new(config).context("Failed to initialize EC client")?;

    tracing::info!("{} {}", method, path);
    match client.call(method, &path, &params).await {
        Ok(body) => {
            println!("{}", body);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
