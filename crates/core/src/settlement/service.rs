//! Settlement state machine.
//!
//! Transitions are validated here and returned as [`SettlementAction`]s;
//! persisting them is left to the caller.

use chrono::Utc;
use rust_decimal::Decimal;

use duet_shared::types::{SettlementId, UserId};

use crate::couple::Couple;
use crate::settlement::error::SettlementError;
use crate::settlement::types::{
    Settlement, SettlementAction, SettlementItem, SettlementRequest, SettlementStatus,
};

/// Stateless service for settlement transitions.
pub struct SettlementWorkflow;

impl SettlementWorkflow {
    /// Opens a pending settlement addressed to the requester's partner.
    ///
    /// # Returns
    /// * `Ok(Settlement)` in `Pending` with the request's items staged
    /// * `Err(SettlementError::NotParticipant)` if the requester is not in the couple
    /// * `Err(SettlementError::EmptySelection)` if no items were staged
    pub fn create(
        couple: &Couple,
        requested_by: UserId,
        request: SettlementRequest,
    ) -> Result<Settlement, SettlementError> {
        let requested_to = couple
            .partner_of(requested_by)
            .ok_or(SettlementError::NotParticipant {
                user_id: requested_by,
            })?;

        if request.items.is_empty() {
            return Err(SettlementError::EmptySelection);
        }
        if let Some(item) = request.items.iter().find(|i| i.amount <= Decimal::ZERO) {
            return Err(SettlementError::NonPositiveAmount {
                transaction_id: item.transaction_id,
                amount: item.amount,
            });
        }
        if request.total_amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveTotal(request.total_amount));
        }
        if request.period_start > request.period_end {
            return Err(SettlementError::InvalidPeriod {
                start: request.period_start,
                end: request.period_end,
            });
        }

        Ok(Settlement {
            id: SettlementId::new(),
            couple_id: couple.id,
            requested_by,
            requested_to,
            settlement_type: request.settlement_type,
            status: SettlementStatus::Pending,
            total_amount: request.total_amount,
            currency: request.currency,
            period_start: request.period_start,
            period_end: request.period_end,
            memo: request.memo,
            staged_items: request.items,
            created_at: Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
            cancelled_by: None,
        })
    }

    /// Confirms a pending settlement, materializing its staged items.
    ///
    /// # Returns
    /// * `Ok(SettlementAction::Confirm)` if the transition is valid
    /// * `Err(SettlementError::InvalidTransition)` if not in Pending status
    /// * `Err(SettlementError::NotAuthorizedToConfirm)` unless `actor` is the counterpart
    pub fn confirm(
        settlement: &Settlement,
        actor: UserId,
    ) -> Result<SettlementAction, SettlementError> {
        if settlement.status != SettlementStatus::Pending {
            return Err(SettlementError::InvalidTransition {
                from: settlement.status,
                to: SettlementStatus::Confirmed,
            });
        }
        if settlement.requested_to != actor {
            return Err(SettlementError::NotAuthorizedToConfirm { user_id: actor });
        }

        let confirmed_at = Utc::now();
        let items = settlement
            .staged_items
            .iter()
            .map(|staged| SettlementItem::from_staged(settlement.id, staged, confirmed_at))
            .collect();

        Ok(SettlementAction::Confirm {
            new_status: SettlementStatus::Confirmed,
            confirmed_by: actor,
            confirmed_at,
            items,
        })
    }

    /// Cancels a pending settlement or reverses a confirmed one.
    ///
    /// Either party may cancel.
    ///
    /// # Returns
    /// * `Ok(SettlementAction::Cancel)` if the transition is valid
    /// * `Err(SettlementError::InvalidTransition)` if already cancelled
    /// * `Err(SettlementError::NotParticipant)` if `actor` is neither party
    pub fn cancel(
        settlement: &Settlement,
        actor: UserId,
    ) -> Result<SettlementAction, SettlementError> {
        if !Self::is_valid_transition(settlement.status, SettlementStatus::Cancelled) {
            return Err(SettlementError::InvalidTransition {
                from: settlement.status,
                to: SettlementStatus::Cancelled,
            });
        }
        if !settlement.involves(actor) {
            return Err(SettlementError::NotParticipant { user_id: actor });
        }

        Ok(SettlementAction::Cancel {
            previous_status: settlement.status,
            new_status: SettlementStatus::Cancelled,
            cancelled_by: actor,
            cancelled_at: Utc::now(),
        })
    }

    /// Returns true if moving from `from` to `to` is allowed.
    #[must_use]
    pub fn is_valid_transition(from: SettlementStatus, to: SettlementStatus) -> bool {
        matches!(
            (from, to),
            (SettlementStatus::Pending, SettlementStatus::Confirmed)
                | (
                    SettlementStatus::Pending | SettlementStatus::Confirmed,
                    SettlementStatus::Cancelled
                )
        )
    }
}
