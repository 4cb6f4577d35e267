//! Deterministic fraud rules
//!
//! Cheap checks evaluated before any model call. Every rule is evaluated;
//! only positive hits produce a [`RuleResult`].

use crate::config::RuleConfig;
use crate::Transaction;

/// New account making a large transaction
pub const REASON_NEW_ACCOUNT_LARGE_AMOUNT: &str = "New account making a large transaction";

/// New device with a medium-large amount
pub const REASON_NEW_DEVICE: &str = "Transaction from a new device and medium-large amount";

/// High risk country of origin
pub const REASON_HIGH_RISK_COUNTRY: &str = "Transaction is from a high risk country";

/// A triggered rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult<'a> {
    /// Transaction the rule fired on
    pub transaction: &'a Transaction,

    /// Always true; negative outcomes are not materialized
    pub is_fraud: bool,

    /// Human-readable reason
    pub reason: String,
}

impl<'a> RuleResult<'a> {
    fn flag(transaction: &'a Transaction, reason: &str) -> Self {
        Self {
            transaction,
            is_fraud: true,
            reason: reason.to_string(),
        }
    }
}

/// Rule engine
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    /// Create rule engine
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// Evaluate all rules against a transaction
    pub fn evaluate<'a>(&self, tx: &'a Transaction) -> Vec<RuleResult<'a>> {
        let mut results = Vec::new();

        if tx.amount > self.config.large_amount && tx.account_age_days < self.config.new_account_days
        {
            results.push(RuleResult::flag(tx, REASON_NEW_ACCOUNT_LARGE_AMOUNT));
        }

        if tx.is_new_device && tx.amount > self.config.new_device_amount {
            results.push(RuleResult::flag(tx, REASON_NEW_DEVICE));
        }

        if self.config.high_risk_countries.contains(&tx.country) {
            results.push(RuleResult::flag(tx, REASON_HIGH_RISK_COUNTRY));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(amount: Decimal, age: i64, new_device: bool, country: &str) -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            user_id: "user-1".to_string(),
            amount,
            currency: "USD".to_string(),
            country: country.to_string(),
            account_age_days: age,
            is_new_device: new_device,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_transaction() {
        let engine = RuleEngine::default();
        assert!(engine.evaluate(&tx(dec!(250), 400, false, "GB")).is_empty());
    }

    #[test]
    fn test_new_account_large_amount() {
        let engine = RuleEngine::default();
        let t = tx(dec!(1000.01), 6, false, "GB");
        let results = engine.evaluate(&t);

        assert_eq!(results.len(), 1);
        assert!(results[0].is_fraud);
        assert_eq!(results[0].reason, REASON_NEW_ACCOUNT_LARGE_AMOUNT);
        assert_eq!(results[0].transaction.id, "tx-1");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let engine = RuleEngine::default();

        // exactly 1000 / exactly 7 days / exactly 500 do not fire
        assert!(engine.evaluate(&tx(dec!(1000), 0, false, "GB")).is_empty());
        assert!(engine.evaluate(&tx(dec!(5000), 7, false, "GB")).is_empty());
        assert!(engine.evaluate(&tx(dec!(500), 100, true, "GB")).is_empty());
    }

    #[test]
    fn test_negative_account_age_counts_as_new() {
        let engine = RuleEngine::default();
        let t = tx(dec!(2000), -3, false, "GB");
        assert_eq!(engine.evaluate(&t).len(), 1);
    }

    #[test]
    fn test_all_rules_reported_in_order() {
        let engine = RuleEngine::default();
        let t = tx(dec!(1500), 1, true, "NG");
        let reasons: Vec<_> = engine.evaluate(&t).into_iter().map(|r| r.reason).collect();

        assert_eq!(
            reasons,
            vec![
                REASON_NEW_ACCOUNT_LARGE_AMOUNT,
                REASON_NEW_DEVICE,
                REASON_HIGH_RISK_COUNTRY
            ]
        );
    }

    #[test]
    fn test_country_match_is_exact() {
        let engine = RuleEngine::default();
        assert!(engine.evaluate(&tx(dec!(10), 100, false, "ru")).is_empty());
        assert_eq!(engine.evaluate(&tx(dec!(10), 100, false, "RU")).len(), 1);
    }

    #[test]
    fn test_overridden_config() {
        let mut config = RuleConfig::default();
        config.high_risk_countries.clear();
        config.high_risk_countries.insert("XX".to_string());
        config.new_device_amount = dec!(100);

        let engine = RuleEngine::new(config);
        assert!(engine.evaluate(&tx(dec!(10), 100, false, "RU")).is_empty());
        assert_eq!(engine.evaluate(&tx(dec!(150), 100, true, "XX")).len(), 2);
    }
}
