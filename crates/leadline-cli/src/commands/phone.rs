use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use leadline_core::{normalize_phone, validate_local_mobile};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct PhoneArgs {
    pub phone: String,
}

#[derive(Debug, Serialize)]
struct PhoneReport<'a> {
    input: &'a str,
    normalized: &'a str,
    local_mobile: bool,
}

pub fn show_phone(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let normalized = normalize_phone(&args.phone, &ctx.config.country_code)
        .ok_or_else(|| invalid_input("phone cannot be empty"))?;
    let local_mobile = validate_local_mobile(&args.phone).is_ok();

    if ctx.json {
        return print_json(&PhoneReport {
            input: args.phone.trim(),
            normalized: normalized.as_str(),
            local_mobile,
        });
    }

    if local_mobile {
        println!("{normalized}");
    } else {
        println!("{normalized} (not a local mobile number)");
    }
    Ok(())
}
