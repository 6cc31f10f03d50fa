use clap::Parser;
use ecotrack::cli::{init_tracing, Cli};
use ecotrack::error::describe_error_code;
use ecotrack::{EcoTrackConfig, EcoTrackError, Pipeline};
use tracing::{debug, error, trace};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<EcoTrackError>() {
            Some(err) => error!(
                "Fatal error [E{:04}] ({}): {:#}",
                err.code(),
                describe_error_code(err.code()),
                e
            ),
            None => error!("Fatal error: {:#}", e),
        }
        eprintln!("An error occurred in processing: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EcoTrackConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    init_tracing(
        &config.log_level.to_lowercase(),
        cli.verbose,
        config.effective_log_file(),
    )?;

    debug!("EcoTrack started with verbosity level: {}", cli.verbose);
    trace!("Resolved configuration: {:?}", config);

    let report = Pipeline::from_config(&config)?.run()?;
    print!("{}", report.render(cli.format)?);

    Ok(())
}
