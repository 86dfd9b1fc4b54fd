//! Display helpers for ledger amounts.
//!
//! Amounts are carried as integer wei end to end; conversion to a decimal
//! ether string happens only here, using `rust_decimal` rather than floats.

use rust_decimal::Decimal;
use willwatch_ledger::Amount;

/// Decimal places between wei and ether.
pub const WEI_DECIMALS: u32 = 18;

const WEI_PER_ETHER: Amount = 1_000_000_000_000_000_000;

/// Format a wei amount as ether with trailing zeros trimmed
/// (`1500000000000000000` → `"1.5"`).
pub fn format_amount(wei: Amount) -> String {
    let decimal = i128::try_from(wei)
        .ok()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, WEI_DECIMALS).ok());
    match decimal {
        Some(d) => d.normalize().to_string(),
        // Beyond Decimal's 96-bit mantissa: split by hand.
        None => {
            let whole = wei / WEI_PER_ETHER;
            let frac = wei % WEI_PER_ETHER;
            if frac == 0 {
                whole.to_string()
            } else {
                let digits = format!("{:018}", frac);
                format!("{}.{}", whole, digits.trim_end_matches('0'))
            }
        }
    }
}

/// Like [`format_amount`], rounded to `dp` decimal places (midpoint away
/// from zero) for compact columns.
pub fn format_amount_rounded(wei: Amount, dp: u32) -> String {
    let decimal = i128::try_from(wei)
        .ok()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, WEI_DECIMALS).ok());
    match decimal {
        Some(d) => d
            .round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string(),
        None => format_amount(wei),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_fractional_ether() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(WEI_PER_ETHER), "1");
        assert_eq!(format_amount(1_500_000_000_000_000_000), "1.5");
        assert_eq!(format_amount(1), "0.000000000000000001");
    }

    #[test]
    fn beyond_decimal_range_falls_back() {
        let huge = u128::MAX;
        let expected = format!(
            "{}.{}",
            huge / WEI_PER_ETHER,
            format!("{:018}", huge % WEI_PER_ETHER).trim_end_matches('0')
        );
        assert_eq!(format_amount(huge), expected);
        assert_eq!(
            format_amount(u128::MAX - u128::MAX % WEI_PER_ETHER),
            (u128::MAX / WEI_PER_ETHER).to_string()
        );
    }

    #[test]
    fn rounding() {
        assert_eq!(format_amount_rounded(1_234_567_000_000_000_000, 4), "1.2346");
        assert_eq!(format_amount_rounded(2 * WEI_PER_ETHER, 4), "2");
        assert_eq!(format_amount_rounded(40_000_000_000_000, 4), "0");
    }
}
