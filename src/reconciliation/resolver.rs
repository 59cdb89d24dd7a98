//! Two-pass identity resolution between payments and obligated payers

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use log::debug;

use crate::reconciliation::normalize::normalize_name;
use crate::similarity::NameSimilarity;
use crate::types::{FuzzySuggestion, MatchType, ObligationAccount, PaymentRecord, ResolvedPayment};

/// Outcome of resolving one payment batch against the obligated accounts
pub(crate) struct Resolution {
    /// One audit record per input payment, in input order
    pub resolved: Vec<ResolvedPayment>,
    /// Name corrections surfaced by the fuzzy pass
    pub suggestions: Vec<FuzzySuggestion>,
    /// Per-payment flag, true once the payment has been matched to an account
    pub consumed: Vec<bool>,
}

/// Resolve payments in two ordered passes, folding matched amounts into the
/// accounts as matches occur.
///
/// `name_pool` is the static snapshot of the obligated payers' normalized
/// names, index-aligned with `accounts`. It is taken before either pass and
/// never shrinks: a payer who already settled remains a valid fuzzy target,
/// so installment payments keep landing on the same account.
pub(crate) fn resolve_payments(
    accounts: &mut [ObligationAccount],
    name_pool: &[String],
    payments: &[PaymentRecord],
    fee: &BigDecimal,
    cutoff: f64,
    similarity: &dyn NameSimilarity,
) -> Resolution {
    let id_index: HashMap<String, usize> = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| (account.id.clone(), idx))
        .collect();

    let mut resolved: Vec<ResolvedPayment> =
        payments.iter().map(ResolvedPayment::unmatched).collect();
    let mut consumed = vec![false; payments.len()];
    let mut suggestions = Vec::new();

    // Exact pass: identifier lookup against the obligated accounts.
    for (idx, payment) in payments.iter().enumerate() {
        let Some(payment_id) = payment.id.as_deref() else {
            continue;
        };
        let Some(&account_idx) = id_index.get(payment_id) else {
            continue;
        };

        let account = &mut accounts[account_idx];
        account.record_payment(&payment.amount, payment.payment_date, fee);
        consumed[idx] = true;
        resolved[idx].resolved_payer_id = Some(account.id.clone());
        resolved[idx].match_type = MatchType::ExactId;
    }

    // Fuzzy pass: single best name match over the static pool. The cutoff
    // comparison is inclusive; ties break to the earliest pool position.
    for (idx, payment) in payments.iter().enumerate() {
        if consumed[idx] {
            continue;
        }

        let entered = normalize_name(Some(&payment.display_name));
        if entered.is_empty() {
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        for (pool_idx, candidate) in name_pool.iter().enumerate() {
            let score = similarity.score(&entered, candidate);
            if score < cutoff {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pool_idx, score));
            }
        }

        let Some((account_idx, score)) = best else {
            continue;
        };

        debug!(
            "fuzzy match '{}' -> '{}' (score {:.3})",
            entered, name_pool[account_idx], score
        );

        let account = &mut accounts[account_idx];
        account.record_payment(&payment.amount, payment.payment_date, fee);
        consumed[idx] = true;
        resolved[idx].resolved_payer_id = Some(account.id.clone());
        resolved[idx].match_type = MatchType::FuzzyName;

        if entered != name_pool[account_idx] {
            suggestions.push(FuzzySuggestion {
                entered_name: payment.display_name.clone(),
                suggested_name: account.display_name.clone(),
            });
        }
    }

    Resolution {
        resolved,
        suggestions,
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::JaroWinkler;
    use crate::types::Payer;
    use chrono::NaiveDate;

    /// Similarity stub returning the same score for every pair
    struct Constant(f64);

    impl NameSimilarity for Constant {
        fn score(&self, _a: &str, _b: &str) -> f64 {
            self.0
        }
    }

    fn obligated(id: &str, name: &str) -> Payer {
        Payer::new(id.to_string(), name.to_string(), "A".to_string(), true)
    }

    fn accounts_and_pool(payers: &[Payer], fee: &BigDecimal) -> (Vec<ObligationAccount>, Vec<String>) {
        let accounts = payers
            .iter()
            .map(|payer| ObligationAccount::new(payer, fee))
            .collect();
        let pool = payers
            .iter()
            .map(|payer| payer.normalized_name.clone())
            .collect();
        (accounts, pool)
    }

    fn payment(id: Option<&str>, name: &str, amount: i64, day: u32) -> PaymentRecord {
        PaymentRecord {
            id: id.map(String::from),
            display_name: name.to_string(),
            amount: BigDecimal::from(amount),
            payment_date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
        }
    }

    #[test]
    fn test_exact_pass_wins_over_fuzzy() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "John Smith"), obligated("P2", "John Smyth")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        // Identifier points at P2 even though the name is P1's.
        let payments = [payment(Some("P2"), "John Smith", 120, 1)];
        let outcome = resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &JaroWinkler);

        assert_eq!(outcome.resolved[0].match_type, MatchType::ExactId);
        assert_eq!(outcome.resolved[0].resolved_payer_id.as_deref(), Some("P2"));
        assert_eq!(accounts[1].paid_amount, BigDecimal::from(120));
        assert_eq!(accounts[0].paid_amount, BigDecimal::from(0));
    }

    #[test]
    fn test_fuzzy_tie_breaks_to_earliest_pool_position() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "Ann Lee"), obligated("P2", "Bea Chu")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        let payments = [payment(None, "anyone", 50, 1)];
        let outcome =
            resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &Constant(0.9));

        assert_eq!(outcome.resolved[0].resolved_payer_id.as_deref(), Some("P1"));
        assert_eq!(accounts[0].paid_amount, BigDecimal::from(50));
        assert_eq!(accounts[1].paid_amount, BigDecimal::from(0));
    }

    #[test]
    fn test_cutoff_comparison_is_inclusive() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "Ann Lee")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        let payments = [payment(None, "ann leigh", 50, 1)];
        let outcome =
            resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &Constant(0.86));

        assert_eq!(outcome.resolved[0].match_type, MatchType::FuzzyName);
    }

    #[test]
    fn test_no_suggestion_when_normalized_names_agree() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "John Smith")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        // Differs only in case and surrounding whitespace, so the
        // normalized names are identical and no correction is suggested.
        let payments = [payment(None, "  JOHN SMITH ", 120, 1)];
        let outcome = resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &JaroWinkler);

        assert_eq!(outcome.resolved[0].match_type, MatchType::FuzzyName);
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_settled_payer_remains_a_fuzzy_target() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "John Smith")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        // Full exact payment first, then a fuzzy installment on top.
        let payments = [
            payment(Some("P1"), "John Smith", 120, 1),
            payment(None, "Jon Smyth", 30, 2),
        ];
        let outcome = resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &JaroWinkler);

        assert_eq!(outcome.resolved[1].match_type, MatchType::FuzzyName);
        assert_eq!(accounts[0].paid_amount, BigDecimal::from(150));
        assert_eq!(accounts[0].outstanding, BigDecimal::from(0));
    }

    #[test]
    fn test_last_payment_date_follows_processing_order() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "John Smith")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        // The fuzzy-pass payment is processed second despite its earlier
        // date, so it wins the last-payment-date slot.
        let payments = [
            payment(Some("P1"), "John Smith", 60, 20),
            payment(None, "Jon Smyth", 60, 5),
        ];
        resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &JaroWinkler);

        assert_eq!(
            accounts[0].last_payment_date,
            NaiveDate::from_ymd_opt(2025, 9, 5)
        );
    }

    #[test]
    fn test_nameless_unmatched_payment_stays_unmatched() {
        let fee = BigDecimal::from(120);
        let payers = [obligated("P1", "John Smith")];
        let (mut accounts, pool) = accounts_and_pool(&payers, &fee);

        let payments = [payment(Some("P9"), "   ", 50, 1)];
        let outcome =
            resolve_payments(&mut accounts, &pool, &payments, &fee, 0.86, &Constant(1.0));

        assert_eq!(outcome.resolved[0].match_type, MatchType::Unmatched);
        assert!(!outcome.consumed[0]);
    }
}
