use std::error::Error;
use std::process::ExitCode;

use varsync_application::ListCollections;

use crate::context::Context;

pub async fn run(ctx: &Context) -> Result<ExitCode, Box<dyn Error>> {
    let store = ctx.load_store().await?;
    let summaries = ListCollections::new(store).execute().await?;

    if summaries.is_empty() {
        println!("No collections in {}", ctx.store_path().display());
    }
    for summary in summaries {
        println!(
            "{}\t[{}]\t{} variable(s)",
            summary.name,
            summary.modes.join(", "),
            summary.variable_count
        );
    }
    Ok(ExitCode::SUCCESS)
}
