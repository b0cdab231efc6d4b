use crate::commands::{print_json, Context};
use crate::error::{invalid_input, rejected};
use anyhow::Result;
use clap::{ArgAction, Args};
use leadline_core::{validate_local_mobile, LeadFormInput};
use leadline_crm::LeadWorkflow;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub car_type: String,
    #[arg(long, default_value = "")]
    pub budget: String,
    /// Accept any phone format instead of local Egyptian mobile numbers
    #[arg(long, action = ArgAction::SetTrue)]
    pub skip_phone_check: bool,
}

pub async fn submit(ctx: &Context<'_>, args: SubmitArgs) -> Result<()> {
    let input = LeadFormInput {
        full_name: args.name,
        phone: args.phone,
        car_type: args.car_type,
        budget: args.budget,
    };
    input
        .validate()
        .map_err(|err| invalid_input(err.to_string()))?;
    if !args.skip_phone_check {
        validate_local_mobile(&input.phone).map_err(|err| invalid_input(err.to_string()))?;
    }

    let workflow = LeadWorkflow::new(ctx.crm_client()?, ctx.workflow_config());
    let result = workflow.submit_lead(&input).await;

    if ctx.json {
        print_json(&result)?;
    } else if let Some(lead) = &result.data {
        println!("{}", result.message.as_deref().unwrap_or("Lead added"));
        println!("lead {}: {}", lead.id, lead.title);
    }

    if result.success {
        Ok(())
    } else {
        let message = result.error.unwrap_or_else(|| "unknown CRM failure".to_string());
        Err(rejected(message))
    }
}
