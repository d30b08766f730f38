use std::error::Error;
use std::process::ExitCode;

use varsync_application::ImportVariables;
use varsync_infrastructure::read_document;

use crate::cli::ImportArgs;
use crate::context::Context;

pub async fn run(ctx: &Context, args: &ImportArgs) -> Result<ExitCode, Box<dyn Error>> {
    let document = read_document(&args.file).await?;
    let settings = ctx.settings().await?;
    let store = ctx.load_store().await?;

    let mut import = ImportVariables::new(store);
    let outcome = import.execute(&document, &settings).await?;

    for substitution in &outcome.substitutions {
        eprintln!("fallback: {substitution}");
    }
    for error in &outcome.errors {
        eprintln!("error: {error}");
    }

    if !outcome.is_applied() {
        if outcome.is_success() {
            println!("Nothing to import");
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("Import rejected with {} error(s), store unchanged", outcome.errors.len());
        return Ok(ExitCode::FAILURE);
    }

    let incomplete = outcome.entries.iter().filter(|entry| !entry.complete).count();
    if args.dry_run {
        println!(
            "Dry run: {} variable(s) would be imported in {} alias pass(es)",
            outcome.entries.len(),
            outcome.passes
        );
    } else {
        ctx.save_store(import.store()).await?;
        println!(
            "Imported {} variable(s) in {} alias pass(es)",
            outcome.entries.len(),
            outcome.passes
        );
    }
    if incomplete > 0 {
        eprintln!("{incomplete} variable(s) are missing values for some modes");
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
