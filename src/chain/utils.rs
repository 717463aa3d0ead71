use alloy::primitives::{
    U256,
    utils::{format_units, parse_units},
};

use super::error::ChainError;

/// Parse a human-entered token amount ("1.5") into base units.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let parsed = parse_units(amount, decimals).map_err(|e| ChainError::InvalidAmount {
        amount: amount.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.is_negative() {
        return Err(ChainError::InvalidAmount {
            amount: amount.to_string(),
            reason: "negative amounts are not allowed".to_string(),
        });
    }
    Ok(parsed.get_absolute())
}

/// Format base units for display with the given decimals.
pub fn format_token_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}
