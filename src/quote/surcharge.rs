use std::collections::HashSet;

use smallvec::SmallVec;

use super::QuoteError;
use crate::domain::SurchargeDef;
use crate::pricing::PricingRules;

/// Selected surcharges resolved against the rule set, in selection order.
pub type ResolvedSurcharges<'a, 'r> = SmallVec<[(&'a str, &'r SurchargeDef); 4]>;

/// Validate a surcharge selection against the rule set.
///
/// Exclusive groups are checked first, in their defined order. The first
/// group holding more than one selected entry is reported with those entries
/// in selection order; selecting the same grouped key twice counts as a
/// conflict. Unknown keys are then reported in selection order, and a key
/// outside every group selected twice is a `DuplicateSurcharge`.
///
/// On success each key is paired with its definition.
pub fn validate_surcharges<'a, 'r>(
    selected: &'a [String],
    rules: &'r PricingRules,
) -> Result<ResolvedSurcharges<'a, 'r>, QuoteError> {
    for group in rules.exclusive_groups() {
        let found: Vec<String> = selected
            .iter()
            .filter(|key| group.contains(*key))
            .cloned()
            .collect();

        if found.len() > 1 {
            return Err(QuoteError::ExclusiveSurchargeConflict { keys: found });
        }
    }

    let mut seen = HashSet::with_capacity(selected.len());
    let mut resolved = ResolvedSurcharges::with_capacity(selected.len());

    for key in selected {
        let def = rules
            .surcharge(key)
            .ok_or_else(|| QuoteError::UnknownSurcharge {
                key: key.clone(),
                valid: rules.surcharges().keys().cloned().collect(),
            })?;
        if !seen.insert(key.as_str()) {
            return Err(QuoteError::DuplicateSurcharge { key: key.clone() });
        }
        resolved.push((key.as_str(), def));
    }

    Ok(resolved)
}
