use crate::cli::OptimizeArgs;
use crate::config::build_config;
use crate::data::load_catalog;
use crate::error::{CliError, Result};
use crate::layout::LayoutFile;
use crate::optimizer::HttpOptimizer;
use crate::render;
use crate::utils::progress::CliProgressHandler;
use slategrid::engine::progress::ProgressReporter;
use slategrid::workflows::{self, optimize::build_request};
use tracing::info;

pub async fn run(args: OptimizeArgs) -> Result<()> {
    let config = build_config(&args.session, Some(&args.optimizer))?;
    let catalog = load_catalog(&config.catalog_path)?;

    info!("Loading layout from {:?}", &config.layout_path);
    let mut session =
        LayoutFile::from_file(&config.layout_path)?.into_session(&catalog, config.grid)?;

    if args.dry_run {
        info!("Dry run requested; printing the optimizer request.");
        let request = build_request(&session);
        let json = serde_json::to_string_pretty(&request)
            .map_err(|e| CliError::Other(e.into()))?;
        println!("{json}");
        return Ok(());
    }

    let before = workflows::evaluate::run(&session);
    let optimizer = HttpOptimizer::new(&config.optimizer)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Requesting an optimized placement from {}...", optimizer.url());
    info!("Invoking the optimize workflow...");
    let report = workflows::optimize::run(&mut session, &optimizer, &reporter).await?;

    let after = workflows::evaluate::run(&session);
    info!(
        before = before.score,
        after = after.score,
        "Optimized placement applied."
    );

    println!(
        "Placed {} item(s), skipped {}, returned {} to stock (optimizer score {:.2}).",
        report.placed, report.skipped, report.returned, report.optimizer_score
    );
    println!(
        "Score: {:.2} -> {:.2} / 100 (raw total {:.2})",
        before.score, after.score, after.raw_total
    );
    println!();
    println!("{}", render::render_grid(&session, &after));

    Ok(())
}
