//! Text rendering of the account dashboard card

use crate::balance::{DisplayState, DisplayStatus};
use crate::config::models::NovaPayConfig;
use crate::session::short_key;

/// Shown when no wallet is connected
pub const CONNECT_PROMPT: &str =
    "Connect your wallet to view your account overview and live SOL balance.";

/// Balance text for a display state, e.g. `"5.0000 SOL"`
pub fn render_balance(display: &DisplayState, symbol: &str, decimals: usize) -> String {
    match display.status() {
        DisplayStatus::Loading => "Loading…".to_string(),
        DisplayStatus::Unknown => "Unavailable".to_string(),
        DisplayStatus::Ready => match display.formatted_value(decimals) {
            Some(value) => format!("{} {}", value, symbol),
            None => "Unavailable".to_string(),
        },
    }
}

/// Renders the dashboard overview for the configured network and token
#[derive(Debug, Clone)]
pub struct DashboardView {
    network_name: String,
    token_symbol: String,
    decimals: usize,
}

impl DashboardView {
    pub fn new(network_name: &str, token_symbol: &str, decimals: usize) -> Self {
        Self {
            network_name: network_name.to_string(),
            token_symbol: token_symbol.to_string(),
            decimals,
        }
    }

    pub fn from_config(config: &NovaPayConfig) -> Self {
        Self::new(
            &config.network.name,
            &config.poller.token_symbol,
            config.poller.display_decimals,
        )
    }

    pub fn balance_text(&self, display: &DisplayState) -> String {
        render_balance(display, &self.token_symbol, self.decimals)
    }

    /// Dashboard lines; the connect prompt when there is no account
    pub fn render(&self, display: &DisplayState) -> String {
        let Some(account_id) = display.account_id() else {
            return CONNECT_PROMPT.to_string();
        };

        [
            format!("Wallet {}", short_key(account_id)),
            format!(
                "{} balance: {}",
                self.token_symbol,
                self.balance_text(display)
            ),
            format!("Network: {}", self.network_name),
            "Account status: Active".to_string(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceReading;

    const ACCOUNT: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    #[test]
    fn test_render_balance_states() {
        let reading = BalanceReading::from_minor_units(1_000_000_000, 1_000_000_000);

        assert_eq!(
            render_balance(&DisplayState::ready(ACCOUNT, &reading), "SOL", 4),
            "1.0000 SOL"
        );
        assert_eq!(
            render_balance(&DisplayState::loading(ACCOUNT), "SOL", 4),
            "Loading…"
        );
        assert_eq!(
            render_balance(&DisplayState::unknown(Some(ACCOUNT)), "SOL", 4),
            "Unavailable"
        );
    }

    #[test]
    fn test_render_rounds_to_decimals() {
        let reading = BalanceReading::from_minor_units(1_234_567_890, 1_000_000_000);
        let display = DisplayState::ready(ACCOUNT, &reading);

        assert_eq!(render_balance(&display, "SOL", 4), "1.2346 SOL");
        assert_eq!(render_balance(&display, "SOL", 2), "1.23 SOL");
    }

    #[test]
    fn test_dashboard_without_session_prompts_to_connect() {
        let view = DashboardView::new("solana-mainnet", "SOL", 4);
        assert_eq!(view.render(&DisplayState::unknown(None)), CONNECT_PROMPT);
    }

    #[test]
    fn test_dashboard_overview() {
        let view = DashboardView::from_config(&NovaPayConfig::default());
        let reading = BalanceReading::from_minor_units(5_000_000_000, 1_000_000_000);
        let rendered = view.render(&DisplayState::ready(ACCOUNT, &reading));

        assert_eq!(
            rendered,
            "Wallet 9WzD…AWWM\nSOL balance: 5.0000 SOL\nNetwork: solana-mainnet\nAccount status: Active"
        );
    }
}
