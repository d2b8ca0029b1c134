//! Price formatting for customer-facing notices.

use rust_decimal::{Decimal, RoundingStrategy};

/// How monetary amounts are rendered in notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    pub currency_symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

impl PriceFormat {
    /// Renders an amount with the currency symbol on the left, e.g. `$1,250.00`.
    ///
    /// Halves round away from zero.
    pub fn format(&self, amount: Decimal) -> String {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimal_places);

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = rounded.abs().to_string();
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = format!("{}{}{}", sign, self.currency_symbol, self.group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    fn group_thousands(&self, whole: &str) -> String {
        let len = whole.len();
        let mut grouped = String::with_capacity(len + len / 3 * self.thousands_separator.len());
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}
