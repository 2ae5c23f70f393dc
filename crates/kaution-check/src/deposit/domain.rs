use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::intake::IntakeError;

/// Tenant's current relationship to the tenancy.
///
/// Serializes as the kebab-case wire name. Reading goes through [`FromStr`]
/// on every path, so JSON bodies and form text accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Situation {
    MovingIn,
    #[default]
    MovingOut,
    DuringTenancy,
}

impl Situation {
    pub const fn ordered() -> [Self; 3] {
        [Self::MovingIn, Self::MovingOut, Self::DuringTenancy]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MovingIn => "Einzug",
            Self::MovingOut => "Auszug",
            Self::DuringTenancy => "Während Mietzeit",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::MovingIn => "moving-in",
            Self::MovingOut => "moving-out",
            Self::DuringTenancy => "during-tenancy",
        }
    }
}

impl FromStr for Situation {
    type Err = IntakeError;

    /// Accepts the wire names as well as the German tags used by older
    /// clients, ignoring case and surrounding whitespace.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "moving-in" | "einzug" => Ok(Self::MovingIn),
            "moving-out" | "auszug" => Ok(Self::MovingOut),
            "during-tenancy" | "waehrend" => Ok(Self::DuringTenancy),
            _ => Err(IntakeError::InvalidSituation(raw.trim().to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Situation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Tenancy facts supplied by the caller. Missing fields default to zero,
/// `false`, empty text or no date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositInput {
    pub situation: Situation,
    /// Monthly net cold rent, excluding utilities.
    pub cold_rent: f64,
    pub deposit_paid: f64,
    pub deposit_in_separate_account: bool,
    pub interest_received: bool,
    pub move_out_date: Option<NaiveDate>,
    pub handover_protocol_exists: bool,
    pub defects_found: bool,
    pub utility_statement_pending: bool,
    pub landlord_withholds: f64,
    /// Empty means the landlord gave no reason.
    pub withhold_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Medium,
    Minor,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Kritisch",
            Self::Medium => "Mittel",
            Self::Minor => "Gering",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    CapExceeded,
    SeparateAccount,
    ReturnOverdue,
    UnjustifiedWithholding,
}

/// One detected compliance issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub text: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclaimable_amount: Option<f64>,
}

impl Problem {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Problematic,
}

impl Verdict {
    pub fn from_problems(problems: &[Problem]) -> Self {
        if problems.iter().any(Problem::is_critical) {
            Self::Problematic
        } else {
            Self::Ok
        }
    }
}

/// Evaluation output. Rebuilt in full on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub situation: Situation,
    pub cold_rent: f64,
    pub deposit_paid: f64,
    pub max_deposit: f64,
    pub deposit_exceeds_max: bool,
    pub overpayment: f64,
    pub problems: Vec<Problem>,
    pub recommendations: Vec<String>,
    pub reasonable_return_period_months: u32,
    /// `DD.MM.YYYY`, present only for move-outs with a known date.
    pub return_due_date: Option<String>,
    pub landlord_withholds: f64,
    pub estimated_interest: f64,
    pub total_refund_due: f64,
    pub verdict: Verdict,
}
