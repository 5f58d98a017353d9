//! Gas dashboard views.

use super::context::{
    GasCalculatorContext, GasContext, GasHistoryContext, StaticPageContext,
    GAS_CALCULATOR_ACTIONS,
};
use super::render::TemplateResponse;
use crate::cache::HistoryCache;
use crate::client::{ConversionProvider, GasDataProvider};
use crate::domain::Breakdown;
use crate::error::{ProviderResult, ViewError, ViewResult};
use crate::models::max_gas_price;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Confirmation target the recommended gas price is computed for.
pub const DEFAULT_CONFIRM_TIME_MINUTES_TARGET: u32 = 4;

/// Below this recommended price the spread is anchored at the recommendation.
pub const LOW_GAS_PRICE_THRESHOLD: f64 = 2.0;

/// Confirmation-time lines of the history chart and their colors.
pub const HISTORY_LINES: [(u32, &str); 5] = [
    (1, "red"),
    (5, "orange"),
    (60, "green"),
    (120, "steelblue"),
    (180, "purple"),
];

/// Handlers behind the gas tool pages.
#[derive(Clone)]
pub struct GasViews {
    gas: Arc<dyn GasDataProvider>,
    fx: Arc<dyn ConversionProvider>,
    history: HistoryCache,
    confirm_time_minutes_target: u32,
}

impl GasViews {
    pub fn new(
        gas: Arc<dyn GasDataProvider>,
        fx: Arc<dyn ConversionProvider>,
        history: HistoryCache,
    ) -> Self {
        Self {
            gas,
            fx,
            history,
            confirm_time_minutes_target: DEFAULT_CONFIRM_TIME_MINUTES_TARGET,
        }
    }

    pub fn with_confirm_time_target(mut self, minutes: u32) -> Self {
        self.confirm_time_minutes_target = minutes;
        self
    }

    /// ETH price in USDT, rounded to whole dollars.
    async fn eth_to_usd(&self) -> ProviderResult<f64> {
        Ok(self.fx.convert_amount(1.0, "ETH", "USDT").await?.round())
    }

    /// Live gas tool: recommended price, confirmation-time spread, advisories.
    pub async fn gas(&self) -> ViewResult<TemplateResponse<GasContext>> {
        let recommended = self
            .gas
            .recommend_min_gas_price_to_confirm_in_time(self.confirm_time_minutes_target)
            .await?;

        let anchor = if recommended < LOW_GAS_PRICE_THRESHOLD {
            Some(recommended)
        } else {
            None
        };

        let (spread, eth_to_usd, advisories) = futures::try_join!(
            self.gas.conf_time_spread(anchor),
            self.eth_to_usd(),
            self.gas.gas_advisories(),
        )?;

        Ok(TemplateResponse::new(
            "gas.html",
            GasContext {
                title: "Live Gas Usage => Predicted Conf Times",
                card_desc: "See the Live Network Conditions for the Ethereum Network",
                eth_to_usd,
                start_gas_cost: recommended,
                gas_advisories: advisories,
                conf_time_spread: spread,
                hide_send_tip: true,
            },
        ))
    }

    pub async fn gas_faq(&self) -> ViewResult<TemplateResponse<StaticPageContext>> {
        Ok(TemplateResponse::new(
            "gas_faq.html",
            StaticPageContext {
                title: "Gas FAQ",
                card_desc: "FAQ about Gas",
                hide_send_tip: true,
            },
        ))
    }

    pub async fn gas_faucet_list(&self) -> ViewResult<TemplateResponse<StaticPageContext>> {
        Ok(TemplateResponse::new(
            "gas_faucet_list.html",
            StaticPageContext {
                title: "Gas Faucet List",
                card_desc: "List of Gas Faucets",
                hide_send_tip: true,
            },
        ))
    }

    /// Cost estimates for common platform actions at current prices.
    pub async fn gas_calculator(&self) -> ViewResult<TemplateResponse<GasCalculatorContext>> {
        let (recommended, spread, eth_to_usd) = futures::try_join!(
            self.gas
                .recommend_min_gas_price_to_confirm_in_time(self.confirm_time_minutes_target),
            self.gas.conf_time_spread(None),
            self.eth_to_usd(),
        )?;

        Ok(TemplateResponse::new(
            "gas_calculator.html",
            GasCalculatorContext {
                title: "Gas Calculator",
                card_desc: "See what popular Gitcoin methods cost at different Gas Prices",
                actions: GAS_CALCULATOR_ACTIONS.to_vec(),
                conf_time_spread: spread,
                eth_to_usd,
                start_gas_cost: recommended,
                hide_send_tip: true,
            },
        ))
    }

    /// History chart. `breakdown` defaults to hourly; unknown values are rejected.
    pub async fn gas_history(
        &self,
        breakdown: Option<&str>,
    ) -> ViewResult<TemplateResponse<GasHistoryContext>> {
        let breakdown = match breakdown {
            None => Breakdown::default(),
            Some(raw) => raw
                .parse::<Breakdown>()
                .map_err(|e| ViewError::InvalidRequest(e.to_string()))?,
        };

        let series = try_join_all(
            HISTORY_LINES
                .iter()
                .map(|(mins, _)| self.history.get_history_cached(breakdown, *mins)),
        )
        .await?;

        let max = max_gas_price(series.iter().map(|s| s.as_slice()));
        let gas_histories: BTreeMap<u32, _> = HISTORY_LINES
            .iter()
            .map(|(mins, _)| *mins)
            .zip(series)
            .collect();

        Ok(TemplateResponse::new(
            "gas_history.html",
            GasHistoryContext {
                title: "Gas History",
                card_desc: "View the history of ethereum network gas prices",
                max,
                lines: HISTORY_LINES.iter().copied().collect(),
                gas_histories,
                breakdown,
                breakdown_ui: breakdown.ui_label(),
                granularity_options: Breakdown::ALL.to_vec(),
            },
        ))
    }
}
