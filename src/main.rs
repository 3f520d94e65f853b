use std::{env, fs::File, io, io::BufReader, process::ExitCode};

use chainset::{
    bench,
    config::Config,
    dataset::Datasets,
    error, housing, info, log,
    report::{self, AnalysisFile},
    Builder, ChainedHashSet, Error, Rng,
};

fn main() -> ExitCode {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = log::init(config.log_level) {
        eprintln!("Could not open {}: {err}", log::LOG_FILE_PATH);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("benchmark aborted: {err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> chainset::Result<()> {
    let input = File::open(&config.input)?;
    let ingest = housing::read_records(BufReader::new(input), config.lines)?;
    info!(
        "read {} records from {} ({} lines skipped)",
        ingest.records.len(),
        config.input.display(),
        ingest.skipped
    );

    let mut rng = config.seed.map(Rng::with_seed).unwrap_or_default();
    let datasets = Datasets::prepare(&ingest.records, &mut rng);

    let mut analysis = AnalysisFile::open(&config.output)?;
    let mut stdout = io::stdout().lock();
    report::write_console_header(&mut stdout, config.lines)?;

    let mut table: ChainedHashSet<_> = Builder::new().try_build()?;
    for (ordering, data) in datasets.iter() {
        table.clear();
        let outcome = bench::run(&mut table, data, ordering, config.lines);

        if outcome.hits != data.len() || outcome.removed != data.len() {
            return Err(Error::Inconsistent(format!(
                "{ordering}: found {} and removed {} of {} records",
                outcome.hits,
                outcome.removed,
                data.len()
            )));
        }

        for measurement in outcome.measurements() {
            report::write_console_row(&mut stdout, measurement)?;
            analysis.append(measurement)?;
        }
        info!(
            "{ordering}: insert {:.2} ms, search {:.2} ms, delete {:.2} ms",
            outcome.insert.millis(),
            outcome.search.millis(),
            outcome.delete.millis()
        );
    }

    analysis.finish()?;
    println!("\nResults have been appended to {}", config.output.display());

    Ok(())
}
