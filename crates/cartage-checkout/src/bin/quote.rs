//! Prices a cart document and prints the breakdown as JSON.
//!
//! ```text
//! quote --cart cart.json [--region SOUTH] [--tier GOLD] [--config checkout.toml]
//! ```
//!
//! Logs go to stderr so stdout stays machine-readable.

use std::error::Error;
use std::path::PathBuf;

use tracing::{debug, info};

use cartage_checkout::{init_tracing, CheckoutConfig};
use cartage_core::{Cart, LoyaltyTier, PricingEngine, Region};

const USAGE: &str =
    "usage: quote --cart <file.json> [--region REGION] [--tier TIER] [--config <checkout.toml>]";

struct Args {
    cart: PathBuf,
    region: Region,
    tier: LoyaltyTier,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut cart = None;
    let mut region = Region::Southeast;
    let mut tier = LoyaltyTier::default();
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value\n{USAGE}"));
        match flag.as_str() {
            "--cart" => cart = Some(PathBuf::from(value()?)),
            "--region" => region = value()?.parse()?,
            "--tier" => tier = value()?.parse()?,
            "--config" => config = Some(PathBuf::from(value()?)),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument '{other}'\n{USAGE}").into()),
        }
    }

    Ok(Args {
        cart: cart.ok_or(USAGE)?,
        region,
        tier,
        config,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let config = CheckoutConfig::load(args.config)?;
    init_tracing(&config.logging.filter);
    debug!(cart = ?args.cart, region = %args.region, tier = %args.tier, "Quoting cart");

    let contents = tokio::fs::read_to_string(&args.cart).await?;
    let cart: Cart = serde_json::from_str(&contents)?;

    let engine = PricingEngine::new(config.pricing);
    let result = engine.price(&cart, args.region, args.tier)?;
    info!(cart_id = %cart.id, total = %result.total, "Cart quoted");

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
