use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;

use crate::client::GeminiClient;
use crate::config::Config;
use crate::plan::{PlanRelay, StudyPlanRequest, Subjects, resolve_credential};

use super::args::GenerateArgs;

pub(crate) fn request_from_args(args: GenerateArgs) -> (StudyPlanRequest, Option<String>) {
    let request = StudyPlanRequest {
        subjects: Subjects::Joined(args.subjects),
        exam_date: Some(args.exam_date),
        study_hours: Some(args.hours),
        learning_style: args.learning_style,
        strengths: args.strengths,
        weaknesses: args.weaknesses,
        goals: Some(args.goals),
        api_key: None,
    };
    (request, args.api_key)
}

pub(crate) async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let (request, api_key) = request_from_args(args);
    let credential = resolve_credential(
        api_key.as_deref(),
        None,
        config.provider.api_key.as_deref(),
    )
    .unwrap_or_default();

    let client = GeminiClient::new(&config.provider)?;
    let relay = PlanRelay::new(Arc::new(client), config.prompt.markdown);

    eprintln!(
        "{} {}",
        "📚 Generating study plan with".dimmed(),
        config.provider.model.cyan()
    );

    let plan = match relay.generate_plan(&request, credential).await {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("{}", "❌ Failed to generate study plan".bold().red());
            return Err(err).context("Study plan generation failed");
        }
    };

    println!("{}", plan.plan_text);
    Ok(())
}
