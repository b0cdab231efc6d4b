use anyhow::{Context as _, Result};
use leadline_config::AppConfig;
use leadline_crm::{PipedriveClient, Stages, WorkflowConfig};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

pub mod completions;
pub mod labels;
pub mod phone;
pub mod submit;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn crm_client(&self) -> Result<PipedriveClient> {
        let token = self.config.api_token()?;
        let timeout = self.config.crm.timeout_secs.map(Duration::from_secs);
        PipedriveClient::new(&self.config.crm.base_url, token, timeout)
            .with_context(|| format!("create CRM client for {}", self.config.crm.base_url))
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            country_code: self.config.country_code.clone(),
            label_name: self.config.label.name.clone(),
            label_color: self.config.label.color,
            label_policy: self.config.label.policy,
            stages: Stages {
                notes: self.config.stages.notes,
                label: self.config.stages.label,
            },
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
