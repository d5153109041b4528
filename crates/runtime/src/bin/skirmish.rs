//! Headless skirmish runner.
use anyhow::Result;
use tactics_content::ContentFactory;
use tactics_runtime::{Skirmish, SkirmishConfig, logging};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();

    let config = SkirmishConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        scenario = %config.scenario,
        max_rounds = config.max_rounds,
        "starting skirmish"
    );

    let factory = ContentFactory::new(&config.data_dir);
    let mut skirmish = Skirmish::load(&factory, &config.scenario)?;
    let outcome = skirmish.run(config.max_rounds);

    match outcome.winner {
        Some(faction) => println!(
            "{} wins after {} rounds ({} turns)",
            faction, outcome.rounds, outcome.turns
        ),
        None => println!(
            "no winner after {} rounds ({} turns)",
            outcome.rounds, outcome.turns
        ),
    }
    Ok(())
}
