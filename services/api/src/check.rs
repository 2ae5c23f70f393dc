use chrono::{Local, NaiveDate};
use clap::Args;
use kaution_check::deposit::money::format_euro;
use kaution_check::deposit::{self, Assessment, DepositForm, Severity};
use kaution_check::error::AppError;
use serde_json::json;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Current situation: moving-in, moving-out or during-tenancy
    #[arg(long, default_value = "moving-out")]
    pub(crate) situation: String,
    /// Monthly net cold rent in euro (without utilities)
    #[arg(long)]
    pub(crate) cold_rent: String,
    /// Deposit actually paid in euro
    #[arg(long)]
    pub(crate) deposit_paid: String,
    /// The deposit is held in a separate account
    #[arg(long)]
    pub(crate) separate_account: bool,
    /// Interest on the deposit has been paid out
    #[arg(long)]
    pub(crate) interest_received: bool,
    /// Move-out date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) move_out_date: Option<String>,
    /// A handover protocol was signed at move-out
    #[arg(long)]
    pub(crate) handover_protocol: bool,
    /// Defects were found at handover
    #[arg(long)]
    pub(crate) defects: bool,
    /// The utility statement for the last period is still outstanding
    #[arg(long)]
    pub(crate) utility_statement_pending: bool,
    /// Amount the landlord keeps back, in euro
    #[arg(long, default_value = "")]
    pub(crate) withheld: String,
    /// Reason the landlord gave for keeping money back
    #[arg(long, default_value = "")]
    pub(crate) withhold_reason: String,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn into_form(self) -> (DepositForm, Option<NaiveDate>, bool) {
        let form = DepositForm {
            situation: Some(self.situation),
            cold_rent: self.cold_rent,
            deposit_paid: self.deposit_paid,
            deposit_in_separate_account: self.separate_account,
            interest_received: self.interest_received,
            move_out_date: self.move_out_date,
            handover_protocol_exists: self.handover_protocol,
            defects_found: self.defects,
            utility_statement_pending: self.utility_statement_pending,
            landlord_withholds: self.withheld,
            withhold_reason: self.withhold_reason,
        };
        (form, self.today, self.json)
    }
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let (form, today, as_json) = args.into_form();
    let input = form.into_input()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let assessment = deposit::evaluate_on(&input, today);

    if as_json {
        let payload = json!({
            "today": today,
            "assessment": assessment,
            "summary": assessment.summary(),
        });
        let rendered = serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("{}", render_assessment(&assessment, today));
    }

    Ok(())
}

fn render_assessment(assessment: &Assessment, today: NaiveDate) -> String {
    let summary = assessment.summary();
    let mut lines = vec![
        format!("Kautions-Check ({})", today.format("%d.%m.%Y")),
        summary.headline.clone(),
        format!("Situation: {}", summary.situation_label),
        String::new(),
        format!("Gezahlt: {}", format_euro(assessment.deposit_paid)),
        format!(
            "Maximum (3× Miete): {}",
            format_euro(assessment.max_deposit)
        ),
    ];

    if let Some(refund) = &summary.refund {
        lines.push(String::new());
        lines.push("Ihre Rückforderung".to_string());
        lines.push(format!(
            "  Gezahlte Kaution: {}",
            format_euro(refund.deposit_paid)
        ));
        if refund.landlord_withholds > 0.0 {
            lines.push(format!(
                "  − Einbehalt: {}",
                format_euro(refund.landlord_withholds)
            ));
        }
        if refund.estimated_interest > 0.0 {
            lines.push(format!(
                "  + Zinsen (geschätzt): {}",
                format_euro(refund.estimated_interest)
            ));
        }
        lines.push(format!(
            "  = Zu erstatten: {}",
            format_euro(refund.total_refund_due)
        ));
        if let Some(due) = &refund.return_due_date {
            lines.push(format!(
                "  Rückgabe fällig bis: {} ({} Monate Frist)",
                due, refund.period_months
            ));
        }
    }

    if summary.problems.is_empty() {
        lines.push(String::new());
        lines.push("Festgestellte Probleme: keine".to_string());
    } else {
        lines.push(String::new());
        lines.push("Festgestellte Probleme".to_string());
        for problem in &summary.problems {
            let marker = match problem.severity {
                Severity::Critical => "x",
                Severity::Medium | Severity::Minor => "!",
            };
            lines.push(format!(
                "- [{}] [{}] {}",
                marker, problem.severity_label, problem.text
            ));
            if let Some(amount) = problem.reclaimable_amount {
                lines.push(format!("    Rückforderbar: {}", format_euro(amount)));
            }
        }
    }

    if !summary.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Empfehlungen".to_string());
        for recommendation in &summary.recommendations {
            lines.push(format!("- {recommendation}"));
        }
    }

    lines.join("\n")
}
