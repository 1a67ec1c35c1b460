mod money;

pub mod helpers;

pub use money::{Money, MoneyConversionError, CURRENCY_SYMBOL, MINOR_UNITS_PER_MAJOR};
