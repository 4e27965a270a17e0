use crate::infra::{InMemoryGovernanceRepository, InMemoryWorkflowNotifier};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

use duvri_gov::error::AppError;
use duvri_gov::workflows::interference::{
    ContractParameters, CostBreakdown, CostMode, DeterminationInput, DuvriKind, EstimatorRates,
    ExtraCostService, ProjectDossier, ProjectId, RupApprovalInput, ScenarioVerdict,
    SppValidationInput, TenderDeclaration, ThresholdPolicy,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Contract base amount in euros
    #[arg(long, default_value_t = 50_000.0)]
    pub(crate) contract_amount: f64,
    /// Number of contractor workers on site
    #[arg(long, default_value_t = 4)]
    pub(crate) workers: u32,
    /// Duration of the works in days
    #[arg(long, default_value_t = 10)]
    pub(crate) duration_days: u32,
    /// Risk label (repeatable), e.g. --risk "chemical agents"
    #[arg(long = "risk")]
    pub(crate) risks: Vec<String>,
    /// Security costs declared in the tender
    #[arg(long, default_value_t = 2_000.0)]
    pub(crate) declared_costs: f64,
    /// Whether security costs were included in the tender
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub(crate) costs_included: bool,
    /// Run the pre-tender reconnaissance variant instead of the operational one
    #[arg(long)]
    pub(crate) reconnaissance: bool,
    /// Determination date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) determination_date: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        contract_amount,
        workers,
        duration_days,
        risks,
        declared_costs,
        costs_included,
        reconnaissance,
        determination_date,
    } = args;

    let repository = Arc::new(InMemoryGovernanceRepository::default());
    let notifier = Arc::new(InMemoryWorkflowNotifier::default());
    let service = Arc::new(ExtraCostService::new(
        repository,
        notifier.clone(),
        EstimatorRates::default(),
    ));

    let project = ProjectId("demo-project".to_string());
    let duvri_kind = if reconnaissance {
        DuvriKind::Reconnaissance
    } else {
        DuvriKind::Operational
    };

    service.store_dossier(ProjectDossier {
        project_id: project.clone(),
        parameters: Some(ContractParameters {
            contract_base_amount: contract_amount,
            worker_count: workers,
            duration_days,
            client_risk_factors: Vec::new(),
            contractor_risk_factors: risks,
            base_cost_percentage: 2.0,
        }),
        tender: TenderDeclaration {
            duvri_kind,
            costs_included_in_tender: costs_included,
            declared_security_costs: declared_costs,
            tender_base_amount: contract_amount,
        },
        cost_mode: CostMode::Automatic,
        manual_costs: None,
    })?;

    println!("Interference-cost governance demo");
    println!(
        "Contract \u{20ac}{contract_amount:.2} | {workers} workers | {duration_days} days | {} DUVRI",
        duvri_kind.label()
    );

    let breakdown = service.estimate(&project)?;
    render_breakdown(&breakdown);

    let verdict = service.review(&project)?;
    render_verdict(&verdict);

    if verdict.requires_action && verdict.delta > 0.0 {
        let thresholds = ThresholdPolicy::default();
        let check = thresholds.classify(verdict.delta, contract_amount);
        println!("\nThreshold self-check ({}):", check.scenario.label());
        println!("- {}", check.rationale);
    }

    if !verdict.requires_action {
        println!("\nNo remediation workflow required.");
        return Ok(());
    }

    println!("\nApproval workflow");
    let case = service.open_case(&project)?;
    println!(
        "- Case {} opened in state '{}' for \u{20ac}{:.2}",
        case.id.0,
        case.state.label(),
        case.amount
    );

    let case = service.validate_spp(
        &project,
        SppValidationInput {
            validator: "Dr. Neri (SPP)".to_string(),
            note: "Coordination measures verified on site".to_string(),
        },
    )?;
    println!("- Technical validation -> '{}'", case.state.label());

    let case = service.approve_rup(
        &project,
        RupApprovalInput {
            approver: "Ing. Bruni (RUP)".to_string(),
            note: "Funding coverage confirmed".to_string(),
            funding_source: "Safety budget 2026".to_string(),
            procurement_reference: Some("CIG-DEMO-001".to_string()),
            budget_chapter: Some("CH-104".to_string()),
        },
    )?;
    println!("- Financial approval -> '{}'", case.state.label());

    let date = determination_date.unwrap_or_else(|| Local::now().date_naive());
    let case = service.register_determination(
        &project,
        DeterminationInput {
            number: "77/2026".to_string(),
            date,
        },
    )?;
    println!("- Determination registered -> '{}'", case.state.label());

    let case = service.communicate_to_contractor(&project)?;
    println!("- Contractor notified -> '{}'", case.state.label());

    match serde_json::to_string_pretty(&case.status_view()) {
        Ok(json) => println!("\nFinal case payload:\n{json}"),
        Err(err) => println!("\nFinal case payload unavailable: {err}"),
    }

    let events = notifier.events();
    println!("\nDispatched notifications: {}", events.len());
    for event in events {
        println!("- [{}] {}", event.state.label(), event.detail);
    }

    Ok(())
}

fn render_breakdown(breakdown: &CostBreakdown) {
    println!("\nSafety cost breakdown");
    println!("- Coordination meetings: \u{20ac}{:.2}", breakdown.meetings);
    println!("- PPE, training, surveillance: \u{20ac}{:.2}", breakdown.ppe);
    println!("- Facility adjustments: \u{20ac}{:.2}", breakdown.facilities);
    println!("- Signage: \u{20ac}{:.2}", breakdown.signage);
    println!("- Safety devices: \u{20ac}{:.2}", breakdown.safety_devices);
    println!("- Inspections: \u{20ac}{:.2}", breakdown.inspections);
    println!("- Other measures: \u{20ac}{:.2}", breakdown.other_measures);
    println!("- Total: \u{20ac}{:.2}", breakdown.total);
    println!("  {}", breakdown.explanatory_note);
}

fn render_verdict(verdict: &ScenarioVerdict) {
    println!("\nScenario verdict");
    println!(
        "- {} / {} (basis: {})",
        verdict.scenario.label(),
        verdict.status.label(),
        verdict.regulatory_basis.label()
    );
    println!(
        "- Operative \u{20ac}{:.2} vs declared \u{20ac}{:.2} (delta \u{20ac}{:.2})",
        verdict.operative_total, verdict.declared_costs, verdict.delta
    );
    println!("- {}", verdict.message);
}
