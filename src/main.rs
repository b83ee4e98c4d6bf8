mod args;
use crate::args::{Args, Commands, DeployArgs, HardwareArgs, InfoArgs, TaskArgs};

use clap::Parser;
use serde_json::Value;
use swan::api::{DeploymentRequest, HardwareConfig, SwanApiError, SwanClient};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] SwanApiError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Args {
        api_key,
        network: _,
        network_url,
        no_login,
        command,
    } = Args::parse();

    let client = SwanClient::new(api_key, false, Some(network_url.environment));
    if !no_login {
        client.try_login().map_err(CliError::from)?;
    }

    match &command {
        Commands::Hardware(args) => {
            let catalog = client.try_get_hardware_config().map_err(CliError::from)?;
            let hardware = filter_hardware(catalog, args);
            if hardware.is_empty() {
                println!("No hardware configuration matches the given filters");
            } else {
                print_hardware(&hardware);
            }
        }
        Commands::Deploy(args) => {
            let response = deploy(&client, args)?;
            print_json(&response)?;
        }
        Commands::Info(args) => info(&client, args)?,
        Commands::Urls(TaskArgs { task_uuid }) => {
            let urls = client.try_get_real_url(task_uuid).map_err(CliError::from)?;
            if urls.is_empty() {
                println!("Deployment {task_uuid} has no URLs yet");
            }
            for url in urls {
                println!("{url}");
            }
        }
        Commands::Payments => {
            let payments = client.try_get_payment_info().map_err(CliError::from)?;
            print_json(&payments)?;
        }
    }
    Ok(())
}

fn filter_hardware(hardware: Vec<HardwareConfig>, args: &HardwareArgs) -> Vec<HardwareConfig> {
    hardware
        .into_iter()
        .filter(|h| !args.available || h.is_available())
        .filter(|h| args.region.as_deref().map_or(true, |r| h.serves_region(r)))
        .collect()
}

fn print_hardware(hardware: &[HardwareConfig]) {
    println!(
        "{:<6} {:<18} {:<6} {:>10} {:<12} REGIONS",
        "ID", "NAME", "TYPE", "PRICE", "STATUS"
    );
    for h in hardware {
        println!(
            "{:<6} {:<18} {:<6} {:>10} {:<12} {}",
            h.id,
            h.name,
            h.hardware_type,
            h.price,
            h.status,
            h.region.join(", ")
        );
    }
}

fn deploy(client: &SwanClient, args: &DeployArgs) -> Result<Value, CliError> {
    let request = DeploymentRequest::new(
        &args.cfg_name,
        &args.region,
        args.start_in,
        args.duration,
        &args.job_source_uri,
        &args.wallet_address,
        &args.tx_hash,
    )
    .with_paid(args.paid);

    println!(
        "Deploying {} in {} for {}s",
        request.cfg_name, request.region, request.duration
    );
    client.try_deploy_task(&request).map_err(CliError::from)
}

fn info(client: &SwanClient, args: &InfoArgs) -> Result<(), CliError> {
    let task_uuid = &args.task.task_uuid;
    match &args.output {
        Some(path) => {
            client.try_get_deployment_info_to_file(task_uuid, path)?;
            println!("Deployment info of {task_uuid} saved to {}", path.display());
        }
        None => print_json(&client.try_get_deployment_info(task_uuid)?)?,
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
