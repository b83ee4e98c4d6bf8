use std::path::PathBuf;

use swan::config::Environment;

fn api_key_value_parser(key: &str) -> Result<String, String> {
    let key = key.trim();
    if key.is_empty() {
        return Err("API key cannot be empty".to_string());
    }
    if key.chars().any(char::is_whitespace) {
        return Err("API key cannot contain whitespace".to_string());
    }
    Ok(key.to_string())
}

fn task_uuid_value_parser(uuid: &str) -> Result<String, String> {
    if uuid.is_empty() {
        return Err("Task UUID cannot be empty".to_string());
    }
    if !uuid.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(
            "Task UUID can only contain alphanumeric characters and hyphens".to_string(),
        );
    }
    Ok(uuid.to_string())
}

fn cfg_name_value_parser(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("Hardware configuration name cannot be empty".to_string());
    }
    if name.len() > 100 {
        return Err("Hardware configuration name cannot exceed 100 characters".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(
            "Hardware configuration name can only contain alphanumeric characters, dots, underscores, and hyphens"
                .to_string(),
        );
    }
    Ok(name.to_string())
}

fn paid_value_parser(paid: &str) -> Result<f64, String> {
    let value: f64 = paid
        .parse()
        .map_err(|e| format!("Invalid amount {paid}: {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err("Paid amount must be a non-negative number".to_string());
    }
    Ok(value)
}

#[derive(clap::Parser)]
#[command(name = "swan")]
#[command(author = "Swan Chain")]
#[command(version)]
#[command(about = "Deploy spaces on the SwanHub compute marketplace")]
#[command(long_about = "
A command-line client for the SwanHub orchestrator.

It lists the hardware configurations on offer, submits space deployments
and retrieves deployment and payment information. The API key is generated
through the SwanHub website and can be passed with --api-key or the
SWAN_API_KEY environment variable.

Examples:
  # List available GPU machines on calibration
  swan --network calibration hardware --available

  # Deploy a space
  swan deploy --cfg-name C1ae.small --region 'North Carolina-US' \\
    --start-in 1700000000 --duration 3600 \\
    --job-source-uri https://example.com/spaces/demo \\
    --wallet 0x1234... --tx-hash 0xabcd...

  # Show the URLs a deployment is served at
  swan urls --task-uuid 12345678-1234-1234-1234-123456789012
")]
pub struct Args {
    /// SwanHub API key
    #[arg(
        long,
        env = "SWAN_API_KEY",
        hide_env_values = true,
        value_parser = api_key_value_parser
    )]
    pub api_key: String,

    /// Orchestrator to use (production, calibration). Overridden by --url
    #[arg(long, value_enum)]
    pub network: Option<NetworkKind>,

    #[command(flatten)]
    pub network_url: Network,

    /// Don't log in before running the command
    #[arg(long, default_value_t = false)]
    pub no_login: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// List hardware configurations offered by the orchestrator
    ///
    /// Examples:
    ///   swan hardware
    ///   swan hardware --available --region 'North Carolina-US'
    Hardware(HardwareArgs),

    /// Submit a space deployment
    ///
    /// The hardware configuration is checked against the region before
    /// anything is sent. Use region `Global` to skip the check.
    Deploy(DeployArgs),

    /// Show deployment information of a task
    ///
    /// Examples:
    ///   swan info --task-uuid 12345678-1234-1234-1234-123456789012
    ///   swan info --task-uuid 12345678-1234-1234-1234-123456789012 --output info.json
    Info(InfoArgs),

    /// Print the URLs the jobs of a deployment are served at
    Urls(TaskArgs),

    /// Show payment information
    Payments,
}

#[derive(clap::Args)]
pub struct HardwareArgs {
    /// Only show configurations with status "available"
    #[arg(long, default_value_t = false)]
    pub available: bool,

    /// Only show configurations offered in this region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,
}

#[derive(clap::Args)]
pub struct DeployArgs {
    /// Hardware configuration name (e.g. C1ae.small)
    #[arg(long = "cfg-name", value_name = "NAME", value_parser = cfg_name_value_parser)]
    pub cfg_name: String,

    /// Region to deploy in, or Global
    #[arg(long, value_name = "REGION")]
    pub region: String,

    /// Unix timestamp the space should start at
    #[arg(long = "start-in", value_name = "TIMESTAMP")]
    pub start_in: u64,

    /// Runtime of the space in seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: u64,

    /// Source URI of the space
    #[arg(long = "job-source-uri", value_name = "URI")]
    pub job_source_uri: String,

    /// Wallet address that paid for the deployment
    #[arg(long = "wallet", value_name = "ADDRESS")]
    pub wallet_address: String,

    /// Payment transaction hash
    #[arg(long = "tx-hash", value_name = "HASH")]
    pub tx_hash: String,

    /// Amount paid
    #[arg(long, value_name = "AMOUNT", default_value_t = 0.0, value_parser = paid_value_parser)]
    pub paid: f64,
}

#[derive(clap::Args)]
pub struct TaskArgs {
    /// Task UUID returned by the deployment
    #[arg(long = "task-uuid", value_name = "UUID", value_parser = task_uuid_value_parser)]
    pub task_uuid: String,
}

#[derive(clap::Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Write the deployment info to this file instead of stdout
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone)]
pub enum NetworkKind {
    /// Target the production orchestrator
    Production,

    /// Target the calibration (staging) orchestrator
    Calibration,
}

#[derive(Clone)]
pub struct Network {
    /// Orchestrator the client talks to
    pub environment: Environment,
}

impl clap::FromArgMatches for Network {
    fn from_arg_matches(matches: &clap::ArgMatches) -> Result<Self, clap::Error> {
        let environment = matches
            .get_one::<Environment>("url")
            .ok_or_else(|| {
                clap::Error::raw(
                    clap::error::ErrorKind::MissingRequiredArgument,
                    "Orchestrator URL could not be determined",
                )
            })?
            .clone();

        Ok(Self { environment })
    }

    fn update_from_arg_matches(&mut self, matches: &clap::ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

fn url_arg() -> clap::Arg {
    clap::Arg::new("url")
        .long("url")
        .env("SWAN_API_URL")
        .help("Orchestrator URL, or one of: production, calibration")
        .value_hint(clap::ValueHint::Url)
        .value_parser(|raw: &str| raw.parse::<Environment>())
        .default_value_ifs([
            ("network", "production", "production"),
            ("network", "calibration", "calibration"),
        ])
        .default_value("production")
}

// Can't derive the default value logic, hence hand rolled instance
impl clap::Args for Network {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        cmd.arg(url_arg())
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        cmd.arg(url_arg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("swan").chain(args.iter().copied()))
    }

    #[test]
    fn test_network_selects_environment() {
        let args = parse(&["--api-key", "k", "--network", "calibration", "payments"]).unwrap();
        assert_eq!(args.network_url.environment, Environment::Calibration);
    }

    #[test]
    fn test_explicit_url_is_custom_environment() {
        let args = parse(&["--api-key", "k", "--url", "http://localhost:8080", "payments"]).unwrap();
        assert_eq!(
            args.network_url.environment.base_url(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_deploy_args() {
        let args = parse(&[
            "--api-key",
            "k",
            "deploy",
            "--cfg-name",
            "C1ae.small",
            "--region",
            "Global",
            "--start-in",
            "1700000000",
            "--duration",
            "3600",
            "--job-source-uri",
            "https://example.com/space",
            "--wallet",
            "0xabc",
            "--tx-hash",
            "0xdef",
        ])
        .unwrap();

        match args.command {
            Commands::Deploy(deploy) => {
                assert_eq!(deploy.cfg_name, "C1ae.small");
                assert_eq!(deploy.duration, 3600);
                assert!(deploy.paid.abs() < f64::EPSILON);
            }
            _ => panic!("Expected deploy command"),
        }
    }

    #[test]
    fn test_value_parsers() {
        assert!(api_key_value_parser("  ").is_err());
        assert!(api_key_value_parser("a b").is_err());
        assert_eq!(api_key_value_parser(" key ").unwrap(), "key");

        assert!(task_uuid_value_parser("../etc").is_err());
        assert!(task_uuid_value_parser("12345678-1234-1234-1234-123456789012").is_ok());

        assert!(cfg_name_value_parser("C1ae.small").is_ok());
        assert!(cfg_name_value_parser("rm -rf").is_err());

        assert!(paid_value_parser("-1").is_err());
        assert!(paid_value_parser("NaN").is_err());
        assert!(paid_value_parser("0.25").is_ok());
    }
}
