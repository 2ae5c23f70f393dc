use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{DepositInput, Situation};

/// Validation errors raised before a form reaches the evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("cold rent is required and must be greater than zero")]
    MissingColdRent,
    #[error("paid deposit is required and must be greater than zero")]
    MissingDepositPaid,
    #[error("unknown situation '{0}' (expected moving-in, moving-out or during-tenancy)")]
    InvalidSituation(String),
    #[error("move-out date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidMoveOutDate(String),
}

/// Raw entries as typed into the check form. Amounts stay text until
/// [`DepositForm::into_input`] converts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositForm {
    pub situation: Option<String>,
    pub cold_rent: String,
    pub deposit_paid: String,
    pub deposit_in_separate_account: bool,
    pub interest_received: bool,
    pub move_out_date: Option<String>,
    pub handover_protocol_exists: bool,
    pub defects_found: bool,
    pub utility_statement_pending: bool,
    pub landlord_withholds: String,
    pub withhold_reason: String,
}

impl DepositForm {
    pub fn into_input(self) -> Result<DepositInput, IntakeError> {
        let situation = match self.situation.as_deref().map(str::trim) {
            None | Some("") => Situation::default(),
            Some(raw) => raw.parse::<Situation>()?,
        };

        let move_out_date = match self.move_out_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| IntakeError::InvalidMoveOutDate(raw.to_string()))?,
            ),
        };

        let input = DepositInput {
            situation,
            cold_rent: parse_amount(&self.cold_rent),
            deposit_paid: parse_amount(&self.deposit_paid),
            deposit_in_separate_account: self.deposit_in_separate_account,
            interest_received: self.interest_received,
            move_out_date,
            handover_protocol_exists: self.handover_protocol_exists,
            defects_found: self.defects_found,
            utility_statement_pending: self.utility_statement_pending,
            landlord_withholds: parse_amount(&self.landlord_withholds),
            withhold_reason: self.withhold_reason,
        };

        validate(&input)?;
        Ok(input)
    }
}

/// The form refuses submission unless rent and paid deposit are positive.
pub fn validate(input: &DepositInput) -> Result<(), IntakeError> {
    if input.cold_rent.is_nan() || input.cold_rent <= 0.0 {
        return Err(IntakeError::MissingColdRent);
    }
    if input.deposit_paid.is_nan() || input.deposit_paid <= 0.0 {
        return Err(IntakeError::MissingDepositPaid);
    }
    Ok(())
}

/// Lenient amount parsing: the longest numeric prefix wins, anything else is `0`.
///
/// A lone comma is read as the decimal separator (`"1200,50"`), since German
/// users type amounts that way.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };

    let prefix = numeric_prefix(&normalized);
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut valid_end = 0;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                valid_end = end + 1;
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return "";
    }

    // exponent, only when followed by at least one digit
    let mut exp_end = valid_end;
    if valid_end < bytes.len() && matches!(bytes[valid_end], b'e' | b'E') {
        let mut cursor = valid_end + 1;
        if matches!(bytes.get(cursor), Some(b'+') | Some(b'-')) {
            cursor += 1;
        }
        let digits_start = cursor;
        while matches!(bytes.get(cursor), Some(b'0'..=b'9')) {
            cursor += 1;
        }
        if cursor > digits_start {
            exp_end = cursor;
        }
    }

    &text[..exp_end]
}
