use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{info, warn};

use super::UpstreamArgs;
use crate::server::auth::{Credentials, TokenSigner};
use crate::server::{self, router::Api};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "VINHA_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(short, long, env = "VINHA_PORT", default_value_t = 5000)]
    port: u16,

    /// Secret used to sign access tokens
    #[arg(long, env = "VINHA_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// User allowed to log in, as name:password (repeatable)
    #[arg(short, long = "user", env = "VINHA_USERS", value_delimiter = ',', hide_env_values = true)]
    users: Vec<String>,

    /// Access token lifetime in minutes
    #[arg(long, default_value_t = 15)]
    token_ttl_minutes: i64,

    #[command(flatten)]
    upstream: UpstreamArgs,
}

pub fn run(args: ServeArgs) -> Result<()> {
    if args.token_secret.trim().is_empty() {
        bail!("token secret must not be empty");
    }
    if args.token_ttl_minutes <= 0 {
        bail!("token lifetime must be positive");
    }

    let users = Credentials::parse(&args.users).context("reading user table")?;
    if users.is_empty() {
        warn!("no users configured; every login will be rejected");
    }

    let source = args
        .upstream
        .source()
        .context("building upstream HTTP client")?;
    info!(
        upstream = %args.upstream.upstream_url,
        timeout_secs = args.upstream.timeout_secs,
        "upstream configured"
    );

    let signer = TokenSigner::new(
        &args.token_secret,
        chrono::Duration::minutes(args.token_ttl_minutes),
    );
    let api = Api::new(Box::new(source), signer, users);

    server::run(&api, &format!("{}:{}", args.bind, args.port))
}
