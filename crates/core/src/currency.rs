//! Currency formatting

use rusty_money::{
    Findable, Formatter, LocalFormat, Money, Params, Position,
    iso::{self, Currency},
};

const SYMBOL_FIRST: &[Position] = &[Position::Sign, Position::Symbol, Position::Amount];
const SYMBOL_LAST: &[Position] = &[Position::Sign, Position::Amount, Position::Symbol];

/// Formats whole-unit amounts as currency strings without fractional digits.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormatter {
    currency: &'static Currency,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(iso::INR)
    }
}

impl CurrencyFormatter {
    /// Create a formatter for the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Create a formatter from an ISO alpha code, e.g. `"INR"`.
    pub fn from_code(code: &str) -> Option<Self> {
        Currency::find(code).map(Self::new)
    }

    /// The currency used by this formatter.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Format an amount, e.g. `150000` as `₹1,50,000`.
    ///
    /// Digits are grouped by the currency's locale. Amounts beyond `i64::MAX` are shown as
    /// `i64::MAX`.
    pub fn format(&self, amount: u64) -> String {
        let money = Money::from_major(i64::try_from(amount).unwrap_or(i64::MAX), self.currency);
        let locale = LocalFormat::from_locale(self.currency.locale);

        Formatter::money(
            &money,
            Params {
                digit_separator: locale.digit_separator,
                exponent_separator: locale.exponent_separator,
                separator_pattern: locale.digit_separator_pattern,
                positions: if self.currency.symbol_first {
                    SYMBOL_FIRST
                } else {
                    SYMBOL_LAST
                },
                rounding: Some(0),
                symbol: Some(self.currency.symbol),
                code: None,
            },
        )
    }
}

/// Format an amount in Indian rupees.
pub fn format_amount(amount: u64) -> String {
    CurrencyFormatter::default().format(amount)
}
