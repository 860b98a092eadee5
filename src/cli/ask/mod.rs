//! Ask command - answers one question from the terminal

use clap::Args;

use crate::domain::PipelineRequest;
use crate::infrastructure::observability::shutdown_tracing;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    #[arg(short, long)]
    pub question: String,

    /// Caller identifier recorded in the audit trail
    #[arg(long)]
    pub user_id: Option<String>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let state = crate::create_app_state(&config).await?;

    let mut request = PipelineRequest::new(args.question);
    if let Some(user_id) = args.user_id {
        request = request.with_user_id(user_id);
    }

    let outcome = state.pipeline.run(request).await?;

    println!("{}", outcome.answer);
    if outcome.cache_hit {
        eprintln!(
            "(cached, similarity {:.3})",
            outcome.similarity.unwrap_or_default()
        );
    }

    shutdown_tracing();
    Ok(())
}
