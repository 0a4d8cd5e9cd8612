/*!
 * HarvestX - Agricultural investment marketplace client
 *
 * Terminal client for the HarvestX marketplace canister:
 * - Stateful data-fetch hooks over the marketplace adapter
 * - Investor and farmer dashboard view models
 * - TOML configuration and structured logging
 */

pub mod cli_style;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod hooks;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, LogLevel};
pub use dashboard::{FarmerDashboard, InvestorDashboard, OfferRow, Panel};
pub use error::{HarvestError, Result};
pub use hooks::{FetchState, FetchTask, MutationState, MutationTask, Phase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
