/*!
 * HarvestX CLI - Command Line Interface
 *
 * Each command opens a marketplace session, mounts the hooks its view
 * needs, waits for them to settle and renders the result.
 */

use clap::{Parser, Subcommand, ValueEnum};
use harvest_connect::{
    CreateOfferRequest, LabelEncode, MarketplaceClient, ProductType, QualityGrade,
    RegisterUserRequest, UserRole,
};
use harvestx::{
    cli_style::{
        self, listings_summary_table, offer_table, panel_ready, platform_stats_table,
        print_error, print_health, print_info, print_success, profile_table, section_header,
        Icons, Theme,
    },
    config::{AppConfig, LogLevel},
    dashboard::{FarmerDashboard, InvestorDashboard, OfferRow, Panel},
    error::{HarvestError, Result, EXIT_SUCCESS},
    hooks::{self, FetchTask},
    logging,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "harvestx")]
#[command(version, about = "Client for the HarvestX agricultural investment marketplace", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Replica URL (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Marketplace canister id (overrides the config file)
    #[arg(long, global = true)]
    canister_id: Option<String>,

    /// Log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check canister health
    Health,

    /// List offers open for investment
    Offers,

    /// Show platform statistics
    Stats,

    /// Show the current user's profile
    Whoami,

    /// Investor dashboard: featured opportunities, stats and health
    Investor,

    /// Farmer dashboard: your listings and their totals
    Farmer,

    /// Register the calling principal
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Farmer, Investor or Admin (anything else registers a guest)
        #[arg(long, default_value = "Investor")]
        role: String,
    },

    /// List a new harvest for investment
    CreateOffer {
        /// Product name, e.g. "Macadamia"
        #[arg(long)]
        product: String,

        /// Nuts, Grains, Legumes, Herbs, Vegetables, Fruits, or any other label
        #[arg(long)]
        product_type: String,

        /// Premium, Grade1, Grade2, Standard, Organic, or a certification name
        #[arg(long)]
        grade: String,

        /// Total quantity in kg
        #[arg(long)]
        quantity: u64,

        /// Minimum investment
        #[arg(long)]
        min_investment: u64,

        /// Price per kg
        #[arg(long)]
        price: f64,

        #[arg(long)]
        location: String,

        /// Expected harvest date (YYYY-MM-DD)
        #[arg(long)]
        harvest_date: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_error(&e.to_string(), hint_for(&e));
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn hint_for(error: &HarvestError) -> Option<&'static str> {
    match error {
        HarvestError::Connect(e) if e.is_transport() => {
            Some("Is the local replica running? Start it with `dfx start`.")
        }
        HarvestError::Config(_) => Some("Check --host, --canister-id and the config file."),
        _ => None,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    // CLI flags override file values
    if let Some(host) = cli.host.clone() {
        config.connect.host = host;
    }
    if let Some(canister_id) = cli.canister_id.clone() {
        config.connect.canister_id = canister_id;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| HarvestError::Other(format!("Failed to start async runtime: {}", e)))?;

    runtime.block_on(run_session(&config, cli.command))
}

async fn run_session(config: &AppConfig, command: Commands) -> Result<()> {
    let client = MarketplaceClient::open(&config.connect).await?;
    let result = handle_command(&client, command).await;
    client.close();
    result
}

async fn handle_command(client: &MarketplaceClient, command: Commands) -> Result<()> {
    // One view per command; cancelling it unmounts every hook it mounted
    let view = CancellationToken::new();

    let result = match command {
        Commands::Health => handle_health(client, &view).await,
        Commands::Offers => handle_offers(client, &view).await,
        Commands::Stats => handle_stats(client, &view).await,
        Commands::Whoami => handle_whoami(client, &view).await,
        Commands::Investor => handle_investor(client, &view).await,
        Commands::Farmer => handle_farmer(client, &view).await,
        Commands::Register { name, email, role } => {
            let request = RegisterUserRequest {
                role: UserRole::from_label(&role),
                email,
                display_name: name,
            };
            handle_register(client, request).await
        }
        Commands::CreateOffer {
            product,
            product_type,
            grade,
            quantity,
            min_investment,
            price,
            location,
            harvest_date,
            description,
        } => {
            let request = CreateOfferRequest {
                product_name: product,
                product_type: ProductType::from_label(&product_type),
                quality_grade: QualityGrade::from_label(&grade),
                total_quantity: quantity,
                minimum_investment: min_investment,
                price_per_kg: price,
                location,
                harvest_date,
                description,
            };
            handle_create_offer(client, request).await
        }
    };

    view.cancel();
    result
}

/// Mount a hook under `view`
fn mounted<T>(task: FetchTask<T>, view: &CancellationToken) -> Arc<FetchTask<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let task = Arc::new(task.with_parent(view));
    task.mount();
    task
}

/// Turn a failed panel into the command's error
fn check_panel<T>(panel: &Panel<T>, what: &str) -> Result<()> {
    match panel {
        Panel::Failed(message) => Err(HarvestError::Other(format!(
            "Failed to load {}: {}",
            what, message
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// QUERIES
// ============================================================================

async fn handle_health(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let health = mounted(hooks::health(client), view);
    let state = health.settled().await;

    print_health(state.value.unwrap_or(false));
    Ok(())
}

async fn handle_offers(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let offers = mounted(hooks::offers(client), view);
    let panel = Panel::from_state(&offers.settled().await)
        .map(|offers| offers.iter().map(OfferRow::from_offer).collect::<Vec<_>>());

    section_header(&format!("{} Available offers", Icons::HARVEST));
    if let Some(rows) = panel_ready(&panel, "offers") {
        if rows.is_empty() {
            print_info("No offers are open for investment right now.");
        } else {
            println!("{}", offer_table(rows));
            info!("Listed {} offers", rows.len());
        }
    }
    check_panel(&panel, "offers")
}

async fn handle_stats(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let stats = mounted(hooks::platform_stats(client), view);
    let panel = Panel::from_state(&stats.settled().await);

    section_header(&format!("{} Platform statistics", Icons::STATS));
    if let Some(stats) = panel_ready(&panel, "platform stats") {
        println!("{}", platform_stats_table(stats));
    }
    check_panel(&panel, "platform stats")
}

async fn handle_whoami(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let user = mounted(hooks::current_user(client), view);
    let panel = Panel::from_state(&user.settled().await);

    section_header(&format!("{} Current user", Icons::USER));
    match panel_ready(&panel, "current user") {
        Some(Some(profile)) => println!("{}", profile_table(profile)),
        Some(None) => print_info("Not registered. Use `harvestx register` to create a profile."),
        None => {}
    }
    check_panel(&panel, "current user")
}

// ============================================================================
// DASHBOARDS
// ============================================================================

async fn handle_investor(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let offers = mounted(hooks::offers(client), view);
    let stats = mounted(hooks::platform_stats(client), view);
    let health = mounted(hooks::health(client), view);

    let (offers, stats, health) =
        tokio::join!(offers.settled(), stats.settled(), health.settled());
    let dashboard = InvestorDashboard::build(&offers, &stats, &health);
    debug!("Investor dashboard built");

    cli_style::print_banner();
    if let Some(healthy) = panel_ready(&dashboard.healthy, "health") {
        print_health(*healthy);
    }

    section_header(&format!("{} Platform", Icons::STATS));
    if let Some(stats) = panel_ready(&dashboard.stats, "platform stats") {
        println!("{}", platform_stats_table(stats));
    }

    section_header(&format!("{} Featured opportunities", Icons::HARVEST));
    if let Some(rows) = panel_ready(&dashboard.featured, "offers") {
        if rows.is_empty() {
            print_info("No active offers at the moment.");
        } else {
            println!("{}", offer_table(rows));
        }
    }

    check_panel(&dashboard.featured, "offers")?;
    check_panel(&dashboard.stats, "platform stats")
}

async fn handle_farmer(client: &MarketplaceClient, view: &CancellationToken) -> Result<()> {
    let user = mounted(hooks::current_user(client), view);
    let offers = mounted(hooks::offers(client), view);

    let (user, offers) = tokio::join!(user.settled(), offers.settled());
    let dashboard = FarmerDashboard::build(&user, &offers);

    cli_style::print_banner();
    section_header(&format!("{} Farmer", Icons::USER));
    match panel_ready(&dashboard.profile, "current user") {
        Some(Some(profile)) => {
            println!("{}", Theme::value(&profile.display_name));
            if !profile.is_farmer() {
                cli_style::print_warning(&format!(
                    "Registered as {}, not as a farmer",
                    profile.role
                ));
            }
        }
        Some(None) => print_info("Not registered. Listings appear once you register as a farmer."),
        None => {}
    }

    section_header(&format!("{} Your listings", Icons::HARVEST));
    if let Some(listings) = panel_ready(&dashboard.listings, "listings") {
        println!("{}", listings_summary_table(listings));
        if listings.rows.is_empty() {
            print_info("You have no offers listed.");
        } else {
            println!("{}", offer_table(&listings.rows));
        }
    }

    check_panel(&dashboard.listings, "listings")
}

// ============================================================================
// UPDATES
// ============================================================================

async fn handle_register(client: &MarketplaceClient, request: RegisterUserRequest) -> Result<()> {
    let register = hooks::register_user(client);

    match register.run(request).await {
        Some(profile) => {
            print_success(&format!(
                "Registered {} as {}",
                profile.display_name, profile.role
            ));
            println!("{}", profile_table(&profile));
            Ok(())
        }
        None => Err(HarvestError::Other(
            register
                .snapshot()
                .error
                .unwrap_or_else(|| hooks::resources::REGISTER_ERROR.to_string()),
        )),
    }
}

async fn handle_create_offer(client: &MarketplaceClient, request: CreateOfferRequest) -> Result<()> {
    let create = hooks::create_offer(client);

    match create.run(request).await {
        Some(offer) => {
            print_success(&format!("Created offer {}", offer.id));
            println!("{}", offer_table(&[OfferRow::from_offer(&offer)]));
            Ok(())
        }
        None => Err(HarvestError::Other(
            create
                .snapshot()
                .error
                .unwrap_or_else(|| hooks::resources::CREATE_OFFER_ERROR.to_string()),
        )),
    }
}
