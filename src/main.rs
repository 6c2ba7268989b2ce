use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use strato::api::http::{
    HttpApplicationRepository, HttpClient, HttpOrganizationActor, HttpQuotaRepository,
    HttpRouteRepository,
};
use strato::api::{ApplicationRepository, OrganizationActor, QuotaRepository, RouteRepository};
use strato::commands::org::ShowOrg;
use strato::commands::quotas::ListQuotas;
use strato::commands::route_mapper::RouteMapper;
use strato::commands::{Command, CommandArgs, run_command};
use strato::requirements::PlatformFactory;
use strato::session::Session;
use strato::terminal::{TerminalUi, Ui};

#[derive(Parser)]
#[command(name = "strato", version, about = "A command-line client for the Strato platform.")]
struct Cli {
    #[command(subcommand)]
    action: Action,

    /// Session database path (defaults to ~/.strato/strato.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Action {
    /// Show or set the API endpoint
    Target {
        /// New API endpoint URL
        url: Option<String>,
    },
    /// Store credentials for the targeted platform
    Login {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        token: String,
        #[arg(short, long)]
        org: Option<String>,
        #[arg(short, long)]
        space: Option<String>,
    },
    /// Forget stored credentials
    Logout,
    /// Bind a route to an application
    MapRoute {
        app: String,
        domain: String,
        /// Hostname for the route (defaults to the bare domain)
        #[arg(short = 'n', long)]
        hostname: Option<String>,
    },
    /// Unbind a route from an application
    UnmapRoute {
        app: String,
        domain: String,
        /// Hostname of the route
        #[arg(short = 'n', long)]
        hostname: Option<String>,
    },
    /// List quotas for the targeted platform
    Quotas,
    /// Show an organization
    Org { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let session = Arc::new(Session::open(&db_path)?);

    match cli.action {
        Action::Target { url } => show_or_set_target(&session, url),
        Action::Login {
            user,
            token,
            org,
            space,
        } => {
            session.login(&user, &token)?;
            if let Some(org) = org {
                session.set_organization(&org)?;
            }
            if let Some(space) = space {
                session.set_space(&space)?;
            }
            println!("Logged in as {user}.");
            Ok(())
        }
        Action::Logout => {
            session.logout()?;
            println!("Logged out.");
            Ok(())
        }
        action => {
            let succeeded = run_platform_command(action, session).await?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine the home directory")?;
    let dir = home.join(".strato");
    std::fs::create_dir_all(&dir).context("failed to create ~/.strato")?;
    Ok(dir.join("strato.db"))
}

fn show_or_set_target(session: &Session, url: Option<String>) -> anyhow::Result<()> {
    match url {
        Some(url) => {
            session.set_target(&url)?;
            println!("API endpoint set to {url}");
        }
        None => match session.target()? {
            Some(url) => {
                println!("API endpoint: {url}");
                let identity = session.identity()?;
                if !identity.username.is_empty() {
                    println!("user:         {}", identity.username);
                }
                if !identity.organization.is_empty() {
                    println!("org:          {}", identity.organization);
                }
                if !identity.space.is_empty() {
                    println!("space:        {}", identity.space);
                }
            }
            None => println!("No API endpoint targeted. Run 'strato target URL' first."),
        },
    }
    Ok(())
}

async fn run_platform_command(action: Action, session: Arc<Session>) -> anyhow::Result<bool> {
    let Some(target) = session.target()? else {
        anyhow::bail!("no API endpoint targeted. Run 'strato target URL' first");
    };
    let token = session.access_token()?;

    let client = Arc::new(HttpClient::new(&target, token));
    let apps: Arc<dyn ApplicationRepository> =
        Arc::new(HttpApplicationRepository::new(Arc::clone(&client)));
    let routes: Arc<dyn RouteRepository> = Arc::new(HttpRouteRepository::new(Arc::clone(&client)));
    let quotas: Arc<dyn QuotaRepository> = Arc::new(HttpQuotaRepository::new(Arc::clone(&client)));
    let orgs: Arc<dyn OrganizationActor> = Arc::new(HttpOrganizationActor::new(client));
    let ui: Arc<dyn Ui> = Arc::new(TerminalUi);

    let factory = PlatformFactory::new(
        Arc::clone(&session),
        Arc::clone(&apps),
        Arc::clone(&routes),
        Arc::clone(&orgs),
        Arc::clone(&ui),
    );

    let (mut command, args): (Box<dyn Command>, CommandArgs) = match action {
        Action::MapRoute {
            app,
            domain,
            hostname,
        } => {
            let mut args = CommandArgs::new(vec![app, domain]);
            if let Some(hostname) = hostname {
                args = args.with_flag("hostname", hostname);
            }
            (
                Box::new(RouteMapper::map(
                    Arc::clone(&ui),
                    Arc::clone(&session),
                    Arc::clone(&routes),
                )),
                args,
            )
        }
        Action::UnmapRoute {
            app,
            domain,
            hostname,
        } => {
            let mut args = CommandArgs::new(vec![app, domain]);
            if let Some(hostname) = hostname {
                args = args.with_flag("hostname", hostname);
            }
            (
                Box::new(RouteMapper::unmap(
                    Arc::clone(&ui),
                    Arc::clone(&session),
                    Arc::clone(&routes),
                )),
                args,
            )
        }
        Action::Quotas => (
            Box::new(ListQuotas::new(
                Arc::clone(&ui),
                Arc::clone(&session),
                quotas,
            )),
            CommandArgs::default(),
        ),
        Action::Org { name } => (
            Box::new(ShowOrg::new(Arc::clone(&ui), Arc::clone(&session))),
            CommandArgs::new(vec![name]),
        ),
        Action::Target { .. } | Action::Login { .. } | Action::Logout => {
            unreachable!("session actions are handled before dispatch")
        }
    };

    let outcome = run_command(command.as_mut(), &args, &factory, ui.as_ref()).await;
    Ok(outcome.succeeded())
}
