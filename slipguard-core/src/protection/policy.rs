//! The protection layer proper: config resolution, validation, recording.

use crate::domain::{
    ConfigError, DecisionRecommendation, ProtectionDecision, Recommendation, SlippageConfig,
    SlippageReport, TradeRequest, UserSlippagePreference,
};
use crate::engine::{
    calculate_actual_slippage, dynamic_tolerance, EstimateError, SlippageEstimator,
};
use crate::protection::preferences::{InMemoryPreferenceStore, PreferenceStore};
use crate::protection::report_log::{BoundedReportLog, ReportLog};
use crate::protection::ProtectionError;
use crate::provider::MarketDepthProvider;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Fraction of the execution budget after which checkpoints warn.
const BUDGET_WARN_FRACTION: f64 = 0.9;

/// Volatility placeholder used until a real signal is wired in. Below the 2.0
/// activation threshold, so it never widens tolerance on its own.
const DEFAULT_VOLATILITY_SIGNAL: f64 = 1.0;

/// Protection & policy layer over the estimation engine.
///
/// Holds the injected market-depth capability, the preference/report/history
/// stores, and a system default config. Shareable across threads behind an
/// `Arc`; all interior state is concurrent-safe.
pub struct SlippageProtection {
    estimator: SlippageEstimator,
    provider: Arc<dyn MarketDepthProvider>,
    preferences: Arc<dyn PreferenceStore>,
    reports: Arc<dyn ReportLog>,
    default_config: SlippageConfig,
    /// Externally supplied volatility signal; not computed by this engine.
    volatility_signal: f64,
}

impl SlippageProtection {
    /// Protection layer with in-memory stores and the system default config.
    pub fn new(provider: Arc<dyn MarketDepthProvider>) -> Self {
        Self {
            estimator: SlippageEstimator::new(),
            provider,
            preferences: Arc::new(InMemoryPreferenceStore::new()),
            reports: Arc::new(BoundedReportLog::new()),
            default_config: SlippageConfig::default(),
            volatility_signal: DEFAULT_VOLATILITY_SIGNAL,
        }
    }

    /// Replace the system default config. Validated like any other write.
    pub fn with_default_config(mut self, config: SlippageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.default_config = config;
        Ok(self)
    }

    /// Inject the volatility signal from a collaborator component.
    pub fn with_volatility_signal(mut self, volatility: f64) -> Self {
        self.volatility_signal = volatility;
        self
    }

    pub fn with_report_log(mut self, reports: Arc<dyn ReportLog>) -> Self {
        self.reports = reports;
        self
    }

    pub fn with_preference_store(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_estimator(mut self, estimator: SlippageEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn estimator(&self) -> &SlippageEstimator {
        &self.estimator
    }

    pub(crate) fn provider(&self) -> &Arc<dyn MarketDepthProvider> {
        &self.provider
    }

    pub(crate) fn reports(&self) -> &Arc<dyn ReportLog> {
        &self.reports
    }

    // ── Config resolution ──────────────────────────────────────────────

    /// Effective config for a request, by precedence: explicit override >
    /// user's symbol override > user's default > system default.
    ///
    /// Stored configs were validated at write time; only the explicit
    /// override needs validating here.
    fn resolve_config(
        &self,
        ctx: &TradeRequest,
        override_config: Option<&SlippageConfig>,
    ) -> Result<SlippageConfig, ConfigError> {
        if let Some(config) = override_config {
            config.validate()?;
            return Ok(config.clone());
        }
        if let Some(user_id) = &ctx.user_id {
            if let Some(pref) = self.preferences.get(user_id) {
                return Ok(pref.config_for(&ctx.symbol).clone());
            }
        }
        Ok(self.default_config.clone())
    }

    // ── Validation ─────────────────────────────────────────────────────

    /// Validate a trade against the effective slippage limit.
    ///
    /// The configured execution budget is a soft deadline: checkpoints log a
    /// warning once 90% of it is spent, but the call always completes and
    /// returns its normal result. Nothing is cancelled mid-flight.
    pub fn validate_trade_execution(
        &self,
        ctx: &TradeRequest,
        override_config: Option<&SlippageConfig>,
    ) -> Result<ProtectionDecision, ProtectionError> {
        let started = Instant::now();
        let config = self.resolve_config(ctx, override_config)?;
        let budget = config.execution_budget();

        let snapshot = self.provider.depth(&ctx.symbol)?;
        let estimate = self.estimator.estimate(ctx, &snapshot)?;
        self.check_budget(ctx, started, budget, "estimate");

        let max_allowed = if config.enable_dynamic_slippage {
            dynamic_tolerance(
                config.max_slippage_percent,
                estimate.liquidity_score,
                self.volatility_signal,
            )
        } else {
            config.max_slippage_percent
        };

        let estimated = estimate.estimated_slippage_percent;
        let decision = if estimated > max_allowed {
            ProtectionDecision {
                allowed: false,
                reason: format!(
                    "estimated slippage {estimated:.3}% exceeds maximum allowed {max_allowed:.3}%"
                ),
                estimated_slippage: estimated,
                max_allowed_slippage: max_allowed,
                recommendation: DecisionRecommendation::Reject,
            }
        } else if estimate.recommendation == Recommendation::Delay {
            ProtectionDecision {
                allowed: false,
                reason: format!(
                    "market conditions require delay: {} (estimated {estimated:.3}%, allowed {max_allowed:.3}%)",
                    estimate.reasoning
                ),
                estimated_slippage: estimated,
                max_allowed_slippage: max_allowed,
                recommendation: DecisionRecommendation::Reject,
            }
        } else if estimate.recommendation == Recommendation::Caution {
            ProtectionDecision {
                allowed: true,
                reason: format!(
                    "proceed with caution: {} (estimated {estimated:.3}%, allowed {max_allowed:.3}%)",
                    estimate.reasoning
                ),
                estimated_slippage: estimated,
                max_allowed_slippage: max_allowed,
                recommendation: DecisionRecommendation::Caution,
            }
        } else {
            ProtectionDecision {
                allowed: true,
                reason: format!(
                    "estimated slippage {estimated:.3}% within allowed {max_allowed:.3}%"
                ),
                estimated_slippage: estimated,
                max_allowed_slippage: max_allowed,
                recommendation: DecisionRecommendation::Proceed,
            }
        };
        self.check_budget(ctx, started, budget, "decision");

        Ok(decision)
    }

    fn check_budget(&self, ctx: &TradeRequest, started: Instant, budget: Duration, checkpoint: &str) {
        let elapsed = started.elapsed();
        if elapsed.as_secs_f64() > budget.as_secs_f64() * BUDGET_WARN_FRACTION {
            warn!(
                symbol = %ctx.symbol,
                checkpoint,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "validation approaching execution time budget"
            );
        }
    }

    // ── Recording ──────────────────────────────────────────────────────

    /// Record the realized slippage of an executed trade.
    ///
    /// A non-positive quantity is an invalid-input error; nothing reaches the
    /// log or history. Expected price comes from the context, falling back to
    /// the provider's current quote. `within_limits` compares against the
    /// static limit (no dynamic widening for record-keeping). The report is
    /// appended to the bounded log and the percent folded into the symbol's
    /// history.
    pub fn record_slippage(
        &self,
        ctx: &TradeRequest,
        actual_price: f64,
    ) -> Result<SlippageReport, ProtectionError> {
        if ctx.quantity <= 0.0 {
            return Err(EstimateError::NonPositiveQuantity(ctx.quantity).into());
        }
        let expected_price = match ctx.expected_price {
            Some(price) => price,
            None => self.provider.current_price(&ctx.symbol, ctx.side)?,
        };
        let realized = calculate_actual_slippage(expected_price, actual_price, ctx.quantity)?;

        let config = self.resolve_config(ctx, None)?;
        let report = SlippageReport {
            symbol: ctx.symbol.clone(),
            side: ctx.side,
            expected_price,
            actual_price,
            quantity: ctx.quantity,
            slippage_amount: realized.amount,
            slippage_percent: realized.percent,
            total_slippage_cost: realized.total_cost,
            within_limits: realized.percent <= config.max_slippage_percent,
            timestamp: Utc::now(),
        };

        self.reports.append(report.clone());
        self.estimator.update_history(&ctx.symbol, realized.percent);
        Ok(report)
    }

    // ── Preference management ──────────────────────────────────────────

    /// Set a user's default config. Validated before any store mutation.
    pub fn set_user_preferences(
        &self,
        user_id: &str,
        config: SlippageConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.preferences.set_default(user_id, config);
        Ok(())
    }

    /// Set a user's per-symbol override. Validated before any store mutation.
    pub fn set_symbol_override(
        &self,
        user_id: &str,
        symbol: &str,
        config: SlippageConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.preferences.set_symbol_override(user_id, symbol, config);
        Ok(())
    }

    pub fn get_user_preferences(&self, user_id: &str) -> Option<UserSlippagePreference> {
        self.preferences.get(user_id)
    }

    /// Clear one user's preferences, or every user's when no id is given.
    pub fn clear_user_preferences(&self, user_id: Option<&str>) {
        match user_id {
            Some(id) => self.preferences.delete(id),
            None => self.preferences.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookLevel, MarketSnapshot, Side};
    use crate::protection::ReportFilter;
    use crate::provider::{DepthError, StaticDepthProvider};

    fn liquid_snapshot() -> MarketSnapshot {
        let bids = (0..25)
            .map(|i| BookLevel::new(45_000.0 * (1.0 - 0.0001 * (i + 1) as f64), 50.0))
            .collect();
        let asks = (0..25)
            .map(|i| BookLevel::new(45_000.0 * (1.0 + 0.0001 * (i + 1) as f64), 50.0))
            .collect();
        MarketSnapshot::new("BTC/USD", 45_000.0, bids, asks)
    }

    fn provider() -> Arc<StaticDepthProvider> {
        let provider = StaticDepthProvider::new();
        provider.insert(liquid_snapshot());
        Arc::new(provider)
    }

    /// Provider whose depth fetch takes longer than the smallest budget.
    struct SlowDepthProvider {
        inner: StaticDepthProvider,
        delay: Duration,
    }

    impl MarketDepthProvider for SlowDepthProvider {
        fn current_price(&self, symbol: &str, side: Side) -> Result<f64, DepthError> {
            self.inner.current_price(symbol, side)
        }

        fn depth(&self, symbol: &str) -> Result<MarketSnapshot, DepthError> {
            std::thread::sleep(self.delay);
            self.inner.depth(symbol)
        }
    }

    #[test]
    fn liquid_market_allows_trade() {
        let protection = SlippageProtection::new(provider());
        let ctx = TradeRequest::new("BTC/USD", Side::Buy, 10.0);

        let decision = protection.validate_trade_execution(&ctx, None).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.recommendation, DecisionRecommendation::Proceed);
        assert!(decision.reason.contains('%'));
    }

    #[test]
    fn explicit_override_takes_precedence() {
        let protection = SlippageProtection::new(provider());
        protection
            .set_user_preferences(
                "alice",
                SlippageConfig {
                    max_slippage_percent: 50.0,
                    ..SlippageConfig::default()
                },
            )
            .unwrap();

        let tight = SlippageConfig {
            max_slippage_percent: 0.0,
            enable_dynamic_slippage: false,
            ..SlippageConfig::default()
        };
        let ctx = TradeRequest::new("BTC/USD", Side::Buy, 10.0).with_user("alice");
        let decision = protection.validate_trade_execution(&ctx, Some(&tight)).unwrap();

        assert!(!decision.allowed);
        assert_eq!(decision.max_allowed_slippage, 0.0);
        assert_eq!(decision.recommendation, DecisionRecommendation::Reject);
    }

    #[test]
    fn invalid_override_rejected_before_estimation() {
        let protection = SlippageProtection::new(provider());
        let bad = SlippageConfig {
            max_slippage_percent: 150.0,
            ..SlippageConfig::default()
        };
        let ctx = TradeRequest::new("BTC/USD", Side::Buy, 10.0);
        assert!(matches!(
            protection.validate_trade_execution(&ctx, Some(&bad)),
            Err(ProtectionError::Config(ConfigError::SlippageOutOfRange(_)))
        ));
    }

    #[test]
    fn depth_failure_propagates() {
        let protection = SlippageProtection::new(Arc::new(StaticDepthProvider::new()));
        let ctx = TradeRequest::new("MISSING", Side::Buy, 1.0);
        assert!(matches!(
            protection.validate_trade_execution(&ctx, None),
            Err(ProtectionError::Depth(_))
        ));
    }

    #[test]
    fn record_slippage_appends_and_updates_history() {
        let protection = SlippageProtection::new(provider());
        let ctx = TradeRequest::new("BTC/USD", Side::Buy, 2.0).with_expected_price(45_000.0);

        let report = protection.record_slippage(&ctx, 45_090.0).unwrap();
        assert_eq!(report.slippage_amount, 90.0);
        assert!((report.slippage_percent - 0.2).abs() < 1e-9);
        assert_eq!(report.total_slippage_cost, 180.0);
        assert!(report.within_limits); // 0.2% <= default 0.5%

        let stats = protection.estimator().historical_stats("BTC/USD").unwrap();
        assert_eq!(stats.sample_count, 1);
        assert!((stats.average_slippage_percent - 0.2).abs() < 1e-9);
    }

    #[test]
    fn record_slippage_rejects_non_positive_quantity() {
        let protection = SlippageProtection::new(provider());

        let negative = TradeRequest::new("BTC/USD", Side::Buy, -2.0).with_expected_price(45_000.0);
        assert!(matches!(
            protection.record_slippage(&negative, 45_090.0),
            Err(ProtectionError::Estimate(EstimateError::NonPositiveQuantity(_)))
        ));

        let zero = TradeRequest::new("BTC/USD", Side::Buy, 0.0).with_expected_price(45_000.0);
        assert!(protection.record_slippage(&zero, 45_090.0).is_err());

        // Nothing leaked into the log, statistics, or history.
        assert!(protection.get_reports(&ReportFilter::default()).is_empty());
        assert_eq!(protection.get_statistics("BTC/USD", 7).total_trades, 0);
        assert!(protection.estimator().historical_stats("BTC/USD").is_none());
    }

    #[test]
    fn record_slippage_falls_back_to_provider_quote() {
        let protection = SlippageProtection::new(provider());

        // Buy without an expected price: the best ask becomes the reference.
        let buy_quote = protection
            .provider()
            .current_price("BTC/USD", Side::Buy)
            .unwrap();
        assert!(buy_quote > 45_000.0);
        let buy = TradeRequest::new("BTC/USD", Side::Buy, 1.0);
        let report = protection.record_slippage(&buy, buy_quote).unwrap();
        assert_eq!(report.expected_price, buy_quote);
        assert_eq!(report.slippage_percent, 0.0);

        // Sell falls back to the best bid instead.
        let sell = TradeRequest::new("BTC/USD", Side::Sell, 1.0);
        let sell_report = protection.record_slippage(&sell, 45_000.0).unwrap();
        assert!(sell_report.expected_price < 45_000.0);
    }

    #[test]
    fn record_slippage_fallback_propagates_depth_failure() {
        let protection = SlippageProtection::new(Arc::new(StaticDepthProvider::new()));
        let ctx = TradeRequest::new("MISSING", Side::Buy, 1.0);
        assert!(matches!(
            protection.record_slippage(&ctx, 100.0),
            Err(ProtectionError::Depth(_))
        ));
        assert!(protection.get_reports(&ReportFilter::default()).is_empty());
    }

    #[test]
    fn soft_deadline_overrun_still_completes() {
        let inner = StaticDepthProvider::new();
        inner.insert(liquid_snapshot());
        let slow = SlowDepthProvider {
            inner,
            delay: Duration::from_millis(150),
        };
        let config = SlippageConfig {
            max_execution_time_ms: 100,
            ..SlippageConfig::default()
        };
        let protection = SlippageProtection::new(Arc::new(slow))
            .with_default_config(config)
            .unwrap();

        // The budget is advisory: blowing it logs a warning but the call
        // returns its normal decision.
        let ctx = TradeRequest::new("BTC/USD", Side::Buy, 10.0);
        let decision = protection.validate_trade_execution(&ctx, None).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.recommendation, DecisionRecommendation::Proceed);
    }

    #[test]
    fn within_limits_uses_static_max_not_dynamic() {
        // Realized 0.8% is over the 0.5% static default; dynamic widening
        // could stretch the limit past 0.8%, but recording must ignore it.
        let provider = Arc::new(StaticDepthProvider::new());
        provider.insert(MarketSnapshot::new(
            "THIN/USD",
            100.0,
            vec![BookLevel::new(99.0, 0.5)],
            vec![BookLevel::new(101.0, 0.5)],
        ));
        let protection = SlippageProtection::new(provider).with_volatility_signal(9.0);

        let ctx = TradeRequest::new("THIN/USD", Side::Buy, 1.0).with_expected_price(100.0);
        let report = protection.record_slippage(&ctx, 100.8).unwrap();
        assert!(!report.within_limits);
    }

    #[test]
    fn clear_user_preferences_single_and_all() {
        let protection = SlippageProtection::new(provider());
        protection
            .set_user_preferences("alice", SlippageConfig::default())
            .unwrap();
        protection
            .set_user_preferences("bob", SlippageConfig::default())
            .unwrap();

        protection.clear_user_preferences(Some("alice"));
        assert!(protection.get_user_preferences("alice").is_none());
        assert!(protection.get_user_preferences("bob").is_some());

        protection.clear_user_preferences(None);
        assert!(protection.get_user_preferences("bob").is_none());
    }

    #[test]
    fn invalid_preference_write_never_applied() {
        let protection = SlippageProtection::new(provider());
        let bad = SlippageConfig {
            max_execution_time_ms: 50,
            ..SlippageConfig::default()
        };
        assert!(protection.set_user_preferences("alice", bad).is_err());
        assert!(protection.get_user_preferences("alice").is_none());
    }
}
