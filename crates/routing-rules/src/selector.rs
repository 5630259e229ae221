//! Rule selection.
//!
//! Filters to enabled rules, evaluates the condition matcher against each,
//! and picks the winner by priority descending, then rule id ascending.
//! A single pass keeps selection deterministic regardless of input order.

use crate::rule::RoutingRule;
use routing_core::RequestDescriptor;
use tracing::debug;

/// Select the winning rule for a request, if any
///
/// Disabled rules never match. Ties on priority resolve by ascending rule
/// id, so re-evaluating the same rule set and request always yields the
/// same result.
#[must_use]
pub fn select<'a>(rules: &'a [RoutingRule], request: &RequestDescriptor) -> Option<&'a RoutingRule> {
    let mut winner: Option<&RoutingRule> = None;

    for rule in rules {
        if !rule.enabled || !rule.conditions.matches(request) {
            continue;
        }

        let better = match winner {
            None => true,
            Some(current) => {
                rule.priority > current.priority
                    || (rule.priority == current.priority && rule.id < current.id)
            }
        };

        if better {
            winner = Some(rule);
        }
    }

    if let Some(rule) = winner {
        debug!(
            request_id = %request.id,
            rule_id = %rule.id,
            priority = rule.priority,
            target = %rule.target_provider,
            "Routing rule selected"
        );
    } else {
        debug!(request_id = %request.id, model = %request.model, "No routing rule matched");
    }

    winner
}
