//! # Trustify Client
//!
//! Command-line front end. Every command boots the client (resuming the
//! stored session), runs, and shuts down; `login` and `logout` change the
//! stored session.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared_bus::{ClientEvent, EventFilter, EventTopic};
use shared_types::claim::{claim_status_label, ClaimResponse, ClaimStatus};
use shared_types::policy::PolicyKind;
use tc_01_session::{BootOutcome, SessionApi};
use tc_03_gateway_client::dashboard_stats;
use tc_04_notifications::NotificationChannelApi;
use tracing::info;

use client_runtime::{ClientConfig, ClientContainer, ClientRuntime};
use trustify_telemetry::{init_telemetry, TelemetryConfig};

/// Trustify insurance client
#[derive(Parser, Debug)]
#[command(name = "trustify-client", version)]
#[command(about = "Command-line client for the Trustify insurance platform")]
struct Cli {
    /// JSON configuration file (environment variables override it)
    #[arg(short, long, env = "TC_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long, env = "TC_USERNAME")]
        username: String,
        #[arg(short, long, env = "TC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the current session
    Whoami,
    /// Navigate to a route through the guards and print where it lands
    Navigate { path: String },
    /// List my policies of one kind (life, car, house)
    Policies { kind: PolicyKind },
    /// List my claims
    Claims {
        /// Only claims in this status (e.g. UNDER_REVIEW)
        #[arg(long)]
        status: Option<ClaimStatus>,
    },
    /// List notifications, or stream them live with --watch
    Notifications {
        #[arg(long)]
        watch: bool,
    },
    /// Administrator commands
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Claims across all users
    Claims {
        #[arg(long)]
        status: Option<ClaimStatus>,
    },
    /// Dashboard statistics
    Stats,
    /// Policies across all users
    Policies,
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_json_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ClientConfig::default(),
    };
    config
        .apply_env(|key| std::env::var(key).ok())
        .context("Invalid environment configuration")?;
    Ok(config)
}

fn print_claims(claims: &[ClaimResponse]) {
    if claims.is_empty() {
        println!("No claims.");
    }
    for claim in claims {
        println!(
            "{:<14} {:<6} {:<14} {:>12.2}  {}",
            claim.claim_number,
            claim.policy_type.as_str(),
            claim_status_label(claim.status),
            claim.claimed_amount,
            claim.description
        );
    }
}

async fn require_session(runtime: &ClientRuntime) -> Result<()> {
    match runtime.boot().await {
        BootOutcome::Authenticated => Ok(()),
        BootOutcome::Unauthenticated => bail!("Not signed in; run `trustify-client login` first"),
        BootOutcome::Failed(reason) => bail!("Could not resume session: {reason}"),
        BootOutcome::TimedOut => bail!("Identity provider did not answer in time"),
    }
}

async fn run(cli: Cli, runtime: &ClientRuntime) -> Result<()> {
    let container = runtime.container();

    match cli.command {
        Command::Login { username, password } => {
            runtime
                .login(&username, &password)
                .await
                .context("Login failed")?;
            println!("Signed in; landed on {}", runtime.current_route());
        }
        Command::Logout => {
            runtime.boot().await;
            container.session.logout().await;
            println!("Signed out.");
        }
        Command::Whoami => {
            runtime.boot().await;
            let session = &container.session;
            if !session.is_authenticated() {
                println!("Not signed in.");
                return Ok(());
            }
            let profile = session.profile();
            println!(
                "user:    {}",
                profile.as_ref().map_or("?", |p| p.display_name("?"))
            );
            println!("subject: {}", session.user_id().unwrap_or_default());
            println!("roles:   {}", session.roles().as_slice().join(", "));
            if let Some(exp) = session.expires_at() {
                println!("expires: {exp}");
            }
            println!("route:   {}", runtime.current_route());
        }
        Command::Navigate { path } => {
            runtime.boot().await;
            let landed = container.router.navigate(&path).await?;
            println!("{landed}");
        }
        Command::Policies { kind } => {
            require_session(runtime).await?;
            let policies = container.policies.list_mine_of(kind).await?;
            if policies.is_empty() {
                println!("No {kind} policies.");
            }
            for policy in policies {
                let header = policy.header();
                println!(
                    "{:<16} {:<5} {:<10} {:>12.2}",
                    header.policy_number.as_deref().unwrap_or("-"),
                    policy.kind().path_segment(),
                    header
                        .status
                        .map(|s| format!("{s:?}").to_uppercase())
                        .unwrap_or_else(|| "-".into()),
                    header.coverage_amount
                );
            }
        }
        Command::Claims { status } => {
            require_session(runtime).await?;
            let claims = match status {
                Some(status) => container.claims.my_claims_by_status(status).await?,
                None => container.claims.my_claims().await?,
            };
            print_claims(&claims);
        }
        Command::Notifications { watch } => {
            require_session(runtime).await?;
            let notifications = &container.notifications;
            if !watch {
                notifications.load_notifications().await?;
                for n in notifications.notifications() {
                    let marker = if n.is_unread() { "*" } else { " " };
                    println!("{marker} {:>5} {}  {}", n.id, n.created_at, n.toast_text());
                }
                println!("{} unread", notifications.unread_count());
                return Ok(());
            }

            let mut events = container
                .bus
                .subscribe(EventFilter::topics(vec![EventTopic::Notifications]));
            println!("Watching notifications; Ctrl+C to stop.");
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(ClientEvent::NotificationReceived(n)) => println!("{}", n.toast_text()),
                        Some(ClientEvent::ChannelConnected { .. }) => info!("Live channel connected"),
                        Some(ClientEvent::ChannelDisconnected { reason }) => {
                            info!(reason = %reason, "Live channel disconnected");
                        }
                        Some(_) => {}
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        Command::Admin(command) => {
            require_session(runtime).await?;
            if !container.session.has_role(shared_types::entities::ROLE_ADMIN) {
                bail!("The admin commands require the admin role");
            }
            match command {
                AdminCommand::Claims { status } => {
                    let claims = match status {
                        Some(status) => container.admin_claims.by_status(status).await?,
                        None => container.admin_claims.all().await?,
                    };
                    print_claims(&claims);
                }
                AdminCommand::Stats => {
                    let stats =
                        dashboard_stats(&container.admin_claims, &container.admin_policies).await?;
                    println!("claims:          {}", stats.claims.total_claims);
                    println!("open claims:     {}", stats.claims.open_count());
                    println!("policies:        {}", stats.total_policies);
                    println!("active policies: {}", stats.active_policies);
                    println!("pending:         {}", stats.pending_policies);
                }
                AdminCommand::Policies => {
                    for policy in container.admin_policies.all().await? {
                        let header = policy.header();
                        println!(
                            "{:<16} {:<5} holder {}",
                            header.policy_number.as_deref().unwrap_or("-"),
                            policy.kind().path_segment(),
                            header
                                .user_profile_id
                                .map_or_else(|| "-".to_string(), |id| id.to_string())
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    let _guard = init_telemetry(telemetry)?;

    let config = load_config(cli.config.as_ref())?;
    let container = ClientContainer::new(config).context("Failed to wire client")?;
    let runtime = ClientRuntime::new(container);

    let result = run(cli, &runtime).await;
    runtime.shutdown().await;
    result
}
