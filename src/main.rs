use clap::{App, Arg};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weight_tracker::build::build_site;
use weight_tracker::config::Config;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weight_tracker=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("project")
                .long("project")
                .value_name("DIR")
                .help("The directory holding data.json (and optionally tracker.yaml)")
                .takes_value(true)
                .default_value("."),
        )
        .get_matches();

    // `default_value` guarantees the argument is present.
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    if let Err(e) = run(project) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(project: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_directory(project)?;
    let summary = build_site(&config)?;

    println!("✓ Updated index.html");
    for page in &summary.entry_pages {
        println!("✓ Created entry page: {}/", page.date);
    }
    println!("\n✓ Generated {} entry pages", summary.entry_pages.len());
    Ok(())
}
