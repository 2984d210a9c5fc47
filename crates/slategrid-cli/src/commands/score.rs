use crate::cli::ScoreArgs;
use crate::config::build_config;
use crate::data::load_catalog;
use crate::error::Result;
use crate::layout::LayoutFile;
use crate::render;
use slategrid::workflows;
use tracing::{info, warn};

pub async fn run(args: ScoreArgs) -> Result<()> {
    let config = build_config(&args.session, None)?;
    let catalog = load_catalog(&config.catalog_path)?;

    info!("Loading layout from {:?}", &config.layout_path);
    let session = LayoutFile::from_file(&config.layout_path)?.into_session(&catalog, config.grid)?;

    let evaluation = workflows::evaluate::run(&session);
    let violations = evaluation.violations().count();
    if violations > 0 {
        warn!(violations, "Some artifacts break their placement conditions.");
    }

    println!("{}", render::render_score(&evaluation));
    if !args.summary {
        println!();
        println!("{}", render::render_grid(&session, &evaluation));
    }

    Ok(())
}
