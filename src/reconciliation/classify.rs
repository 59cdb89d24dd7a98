//! Classification of payments that matched no obligated account

use std::collections::HashSet;

use crate::reconciliation::normalize::normalize_name;
use crate::types::{MatchType, Payer, PaymentRecord, ResolvedPayment};

/// Payments from people known in the full payer table but not matched to any
/// obligation account, i.e. known people who are not on the obligated list.
///
/// An empty normalized name never counts as known; a payment with no
/// identifier and a blank name cannot be attributed to anyone.
pub(crate) fn paid_but_not_selected(
    payers: &[Payer],
    payments: &[PaymentRecord],
    consumed: &[bool],
) -> Vec<PaymentRecord> {
    let known_ids: HashSet<&str> = payers.iter().map(|payer| payer.id.as_str()).collect();
    let known_names: HashSet<&str> = payers
        .iter()
        .map(|payer| payer.normalized_name.as_str())
        .filter(|name| !name.is_empty())
        .collect();

    payments
        .iter()
        .enumerate()
        .filter(|(idx, _)| !consumed[*idx])
        .filter(|(_, payment)| {
            let id_known = payment
                .id
                .as_deref()
                .is_some_and(|id| known_ids.contains(id));
            let name = normalize_name(Some(&payment.display_name));
            id_known || (!name.is_empty() && known_names.contains(name.as_str()))
        })
        .map(|(_, payment)| payment.clone())
        .collect()
}

/// Every audit record that matched no obligated account.
///
/// This set may overlap with [`paid_but_not_selected`]: being unmatched only
/// means no *obligated* payer matched, which says nothing about whether the
/// person is known. The overlap is intentional and is not deduplicated.
pub(crate) fn unmatched_payments(resolved: &[ResolvedPayment]) -> Vec<ResolvedPayment> {
    resolved
        .iter()
        .filter(|payment| payment.match_type == MatchType::Unmatched)
        .cloned()
        .collect()
}
