use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use epochmint_epochs::EpochHookList;
use epochmint_mint::{EpochMintReport, GenesisState, MintKeeper, PotPolicy};
use epochmint_treasury::{AccountLedger, CommunityPool, FeePoolStats, TreasuryState};
use epochmint_types::{modules, EpochNumber};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Pretty,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Epoch mint simulator", long_about = None)]
struct Args {
    /// Genesis file (TOML/JSON/YAML). Built-in defaults if omitted.
    #[arg(long)]
    genesis: Option<PathBuf>,

    /// Number of epochs to replay
    #[arg(long, default_value_t = 52)]
    epochs: u32,

    /// First epoch number delivered
    #[arg(long, default_value_t = 1)]
    first_epoch: EpochNumber,

    /// Epoch identifier to deliver; defaults to the configured one
    #[arg(long)]
    identifier: Option<String>,

    /// Lock denomination targeted by pool-incentive pots
    #[arg(long)]
    lp_denom: Option<String>,

    /// Write the final state as genesis JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Include every epoch report in the output
    #[arg(long)]
    verbose: bool,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Serialize)]
struct Balances {
    supply: u128,
    fee_collector: u128,
    incentives: u128,
    community_pool: u128,
    developer: u128,
}

#[derive(Debug, Serialize)]
struct Summary {
    identifier: String,
    first_epoch: EpochNumber,
    last_epoch: EpochNumber,
    epochs_minted: usize,
    reductions: usize,
    pots_created: usize,
    final_epoch_provisions: String,
    last_halven_epoch: EpochNumber,
    balances: Balances,
    community_pool_stats: FeePoolStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reports: Vec<EpochMintReport>,
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the JSON summary
    match args.log_format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn load_genesis(path: Option<&PathBuf>) -> Result<GenesisState> {
    match path {
        Some(path) => GenesisState::from_file(path)
            .with_context(|| format!("failed to load genesis from {}", path.display())),
        None => Ok(GenesisState::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let genesis = load_genesis(args.genesis.as_ref())?;
    let mut pot_policy = PotPolicy::default();
    if let Some(lp_denom) = &args.lp_denom {
        pot_policy.lp_denom = lp_denom.clone();
    }

    let keeper = Arc::new(MintKeeper::in_memory(&genesis)?.with_pot_policy(pot_policy));
    let mut hooks = EpochHookList::<TreasuryState>::new().with_hook(Box::new(keeper.hooks()));
    let mut state = TreasuryState::new();

    let params = keeper.params();
    let identifier = args
        .identifier
        .clone()
        .unwrap_or_else(|| params.epoch_identifier.clone());
    let last_epoch = args.first_epoch + EpochNumber::from(args.epochs) - 1;
    info!(
        "Replaying {} {} epoch(s) from #{} with hooks {:?}",
        args.epochs,
        identifier,
        args.first_epoch,
        hooks.names()
    );

    let mut reports = Vec::new();
    for epoch in args.first_epoch..=last_epoch {
        hooks.before_epoch_start(&mut state, &identifier, epoch)?;
        let before = keeper.last_report();
        hooks
            .after_epoch_end(&mut state, &identifier, epoch)
            .with_context(|| format!("epoch {epoch} aborted"))?;
        let after = keeper.last_report();
        if after != before {
            reports.extend(after);
        }
    }

    let denom = params.mint_denom.as_str();
    let developer = params
        .developer_rewards_receiver
        .map(|receiver| state.balance(&receiver, denom))
        .unwrap_or(0);
    let minter = keeper.minter();
    let summary = Summary {
        identifier,
        first_epoch: args.first_epoch,
        last_epoch,
        epochs_minted: reports.len(),
        reductions: reports.iter().filter(|r| r.halved).count(),
        pots_created: state.pots().len(),
        final_epoch_provisions: minter.epoch_provisions.to_string(),
        last_halven_epoch: minter.last_halven_epoch,
        balances: Balances {
            supply: state.supply(denom),
            fee_collector: state.module_balance(modules::FEE_COLLECTOR, denom),
            incentives: state.module_balance(modules::INCENTIVES, denom),
            community_pool: state.community_pool(denom),
            developer,
        },
        community_pool_stats: state.fee_pool().statistics(),
        reports: if args.verbose { reports } else { Vec::new() },
    };

    if let Some(path) = &args.export {
        std::fs::write(path, keeper.export_genesis().to_json_pretty()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Exported genesis to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
