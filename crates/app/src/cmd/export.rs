use std::error::Error;
use std::process::ExitCode;

use varsync_application::ExportVariables;
use varsync_infrastructure::{render_document, write_document};

use crate::cli::ExportArgs;
use crate::context::Context;

pub async fn run(ctx: &Context, args: &ExportArgs) -> Result<ExitCode, Box<dyn Error>> {
    let store = ctx.load_store().await?;
    let document = ExportVariables::new(store)
        .execute(args.collection.as_deref(), args.color_format)
        .await?;

    match &args.output {
        Some(path) => {
            write_document(path, &document).await?;
            tracing::info!(path = %path.display(), "wrote export");
        }
        None => print!("{}", render_document(&document)?),
    }
    Ok(ExitCode::SUCCESS)
}
