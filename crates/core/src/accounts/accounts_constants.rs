/// Prefix of generated account numbers
pub const ACCOUNT_NUMBER_PREFIX: &str = "ACC";

/// Digits following the prefix
pub const ACCOUNT_NUMBER_DIGITS: usize = 10;

/// Prefix of generated cash transaction numbers
pub const TRANSACTION_NUMBER_PREFIX: &str = "TRX";
