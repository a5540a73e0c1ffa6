use anyhow::Result;

use runpanel::{init_logging, RunContext};

fn main() -> Result<()> {
    // Discover the project root and read the run number before any tracing calls
    let context = RunContext::discover()?;
    context.describe_root()?;

    let guard = init_logging(&context)?;

    tracing::info!("Started");
    tracing::trace!("Trace");
    tracing::debug!("Debug");
    tracing::info!("Info");
    runpanel::success!("Success");
    tracing::warn!("Warning");
    tracing::error!("Error");
    runpanel::critical!("Critical");
    tracing::info!("Finished");

    let next = guard.complete()?;
    tracing::debug!("Next run will be {}", next);
    Ok(())
}
