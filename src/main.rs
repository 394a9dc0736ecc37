use anyhow::Context;
use std::io;
use std::sync::Arc;
use word_guess::cli::{CliInterface, parse_cli};
use word_guess::logging::{LogTarget, default_log_path, init_logging};
use word_guess::tui::TuiInterface;
use word_guess::{Catalog, Game, build_strategy, game_loop, load_catalog_from_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_cli();

    let log_target = match (cli.tui, default_log_path()) {
        (true, Some(path)) => LogTarget::File(path),
        _ => LogTarget::Stderr,
    };
    init_logging(&log_target);

    let config = cli.game_config().context("Invalid game configuration")?;
    let catalog = match &cli.catalog_path {
        Some(path) => load_catalog_from_file(path)
            .with_context(|| format!("Failed to load word catalog from '{path}'"))?,
        None => Catalog::embedded().context("Built-in word catalog is invalid")?,
    };
    log::info!(
        "Loaded {} words, strategy '{}', {} attempts",
        catalog.len(),
        config.strategy,
        config.max_attempts
    );

    let strategy = build_strategy(config.strategy, cli.scoring_config());
    let mut game = Game::new(config, Arc::new(catalog), strategy);

    if cli.tui {
        let mut interface = TuiInterface::new().context("Failed to initialise terminal")?;
        game_loop(&mut game, &mut interface).await;
        interface.cleanup().context("Failed to restore terminal")?;
    } else {
        let mut interface = CliInterface::new(io::stdin().lock());
        game_loop(&mut game, &mut interface).await;
    }
    Ok(())
}
