//! Court-fee schedule. Amounts are whole rupees; conversion to minor
//! units happens only when a payment order is created.

use shared_types::{CourtLevel, FilingType};

/// Flat processing charge added to every filing.
pub const SERVICE_CHARGE: i64 = 50;

/// Server-side fee breakdown for a draft. Client-supplied amounts are
/// never trusted; this is recomputed on every save and submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub estimated_fee: i64,
    pub service_charge: i64,
    pub total_amount: i64,
}

/// Base fee for a court level / filing type pair. Pairs outside the
/// published schedule carry no base fee.
pub fn base_fee(court_level: CourtLevel, filing_type: FilingType) -> i64 {
    use CourtLevel::*;
    use FilingType::*;
    match (court_level, filing_type) {
        (Supreme, Petition) => 5000,
        (Supreme, Appeal) => 3000,
        (Supreme, Application) => 1000,
        (High, Petition) => 2000,
        (High, Appeal) => 1500,
        (High, Application) => 500,
        (District, Petition) => 500,
        (District, Appeal) => 300,
        (District, Application) => 200,
        (Subordinate, Petition) => 200,
        (Subordinate, Appeal) => 150,
        (Subordinate, Application) => 100,
        _ => 0,
    }
}

/// Compute the full breakdown. A draft with either field missing has no
/// estimated fee yet but still carries the service charge in its total.
pub fn calculate(
    court_level: Option<CourtLevel>,
    filing_type: Option<FilingType>,
) -> FeeBreakdown {
    let estimated_fee = match (court_level, filing_type) {
        (Some(level), Some(ft)) => base_fee(level, ft),
        _ => 0,
    };
    FeeBreakdown {
        estimated_fee,
        service_charge: SERVICE_CHARGE,
        total_amount: estimated_fee + SERVICE_CHARGE,
    }
}
