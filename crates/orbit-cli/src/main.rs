use clap::{Parser, Subcommand};
use orbit_types::Network;
use orbit_wallet::OrbitConfig;
use std::path::PathBuf;

mod commands;

/// Orbit wallet command-line interface.
#[derive(Parser)]
#[command(name = "orbit-wallet-cli")]
#[command(about = "Terminal front-end for the Orbit MultiversX wallet")]
#[command(version)]
struct Cli {
    /// Network to use (mainnet, devnet, testnet).
    #[arg(long, default_value = "devnet")]
    network: Network,

    /// Gateway URL (overrides the config file and network default).
    #[arg(long)]
    gateway: Option<String>,

    /// Reward relayer URL (overrides the config file).
    #[arg(long)]
    relayer: Option<String>,

    /// Data directory holding state.json and config.json.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Name used in the dashboard greeting.
    #[arg(long, env = "ORBIT_USER_NAME", default_value = "")]
    name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a wallet (first run).
    Onboard {
        /// Restore from an existing 24-word phrase instead of generating one.
        #[arg(long)]
        restore: bool,
    },

    /// Show the reward timer once.
    Dashboard,

    /// Show the reward timer, refreshing every second until Ctrl-C.
    Watch,

    /// Claim the reward of the finished window.
    Claim,

    /// Discard the current window and start a new one now.
    Reset,

    /// Show EGLD and reward token balances.
    Balance,

    /// Send EGLD or an ESDT token.
    Send {
        /// Recipient address (erd1...).
        #[arg(long, conflicts_with = "scan")]
        to: Option<String>,

        /// Scanned QR payload (address or multiversx: URI).
        #[arg(long)]
        scan: Option<String>,

        /// Amount in display units (e.g. "1.5"). Taken from the QR payload if omitted.
        #[arg(long)]
        amount: Option<String>,

        /// ESDT token identifier; EGLD if omitted.
        #[arg(long)]
        token: Option<String>,

        /// Decimals of --token (defaults to the reward token's, else 18).
        #[arg(long)]
        decimals: Option<u32>,
    },

    /// Show the wallet address as text and QR code.
    Receive,

    /// Reveal the recovery phrase.
    Seed,

    /// Change the wallet PIN.
    ChangePin,

    /// Show the processing status of a transaction.
    Status {
        /// Transaction hash.
        hash: String,
    },

    /// Swaps tab.
    Swaps,

    /// Quests tab.
    Quests,
}

/// Application context shared across commands.
struct AppContext {
    config: OrbitConfig,
    data_dir: PathBuf,
    user_name: String,
}

impl AppContext {
    fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir(cli.network));

        let mut config = OrbitConfig::load(&data_dir, cli.network)?;
        if let Some(ref url) = cli.gateway {
            config.gateway_url = url.clone();
        }
        if let Some(ref url) = cli.relayer {
            config.relayer_url = url.clone();
        }
        log::debug!(
            "network={} gateway={} relayer={} data_dir={}",
            config.network,
            config.gateway_url,
            config.relayer_url,
            data_dir.display()
        );

        Ok(Self {
            config,
            data_dir,
            user_name: cli.name.clone(),
        })
    }
}

fn default_data_dir(network: Network) -> PathBuf {
    let base = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orbit");
    match network {
        Network::Mainnet => base,
        Network::Devnet => base.join("devnet"),
        Network::Testnet => base.join("testnet"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let ctx = match AppContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Onboard { restore } => commands::onboard(&ctx, restore).await,
        Commands::Dashboard => commands::dashboard(&ctx).await,
        Commands::Watch => commands::watch(&ctx).await,
        Commands::Claim => commands::claim(&ctx).await,
        Commands::Reset => commands::reset(&ctx).await,
        Commands::Balance => commands::balance(&ctx).await,
        Commands::Send {
            to,
            scan,
            amount,
            token,
            decimals,
        } => commands::send(&ctx, to, scan, amount, token, decimals).await,
        Commands::Receive => commands::receive(&ctx).await,
        Commands::Seed => commands::show_seed(&ctx).await,
        Commands::ChangePin => commands::change_pin(&ctx).await,
        Commands::Status { hash } => commands::tx_status(&ctx, &hash).await,
        Commands::Swaps => commands::placeholder_tab(&ctx, orbit_wallet::Tab::Swaps).await,
        Commands::Quests => commands::placeholder_tab(&ctx, orbit_wallet::Tab::Quests).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
