use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let format = || {
        clap::arg!(-f --format <FORMAT> "Output format (csv, json)")
            .value_name("FORMAT")
            .default_value("csv")
            .value_parser(["csv", "json"])
    };
    let output = || {
        clap::arg!(-o --output <FILE> "Output file (default: stdout)")
            .value_name("FILE")
            .value_parser(clap::value_parser!(std::path::PathBuf))
    };

    let mut cmd = clap::Command::new("ascension")
        .version("0.1.0")
        .author("Ascension Contributors")
        .about("Scrape character ascension stats into a flat dataset")
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("scrape")
                .about("Extract every listed character and write the long-form dataset")
                .arg(clap::arg!(--url <URL> "Category listing URL"))
                .arg(
                    clap::arg!(--dir <DIR> "Read a saved mirror from this directory instead of the web")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--listing <FILE> "Listing file inside the mirror directory").default_value("listing.html"))
                .arg(output())
                .arg(format())
                .arg(
                    clap::arg!(--config <FILE> "JSON file overriding layout selectors and excluded names")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
                .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA")),
        )
        .subcommand(
            clap::Command::new("leveled")
                .about("Reduce a dataset file to one row per character at its final level")
                .arg(clap::arg!(<INPUT> "Dataset file, or '-' for stdin"))
                .arg(output())
                .arg(format()),
        )
        .subcommand(
            clap::Command::new("summary")
                .about("Group the leveled view and aggregate one stat")
                .arg(clap::arg!(<INPUT> "Dataset file, or '-' for stdin"))
                .arg(
                    clap::arg!(--by <KEY> "Column to group on (repeatable)")
                        .action(clap::ArgAction::Append)
                        .value_parser(["rarity", "weapon", "element", "sex", "region", "ascension-stat"]),
                )
                .arg(
                    clap::arg!(--metric <METRIC> "Stat to average, or 'quantity' to count rows")
                        .default_value("quantity")
                        .value_parser(["hp", "atk", "def", "quantity"]),
                )
                .arg(
                    clap::arg!(--policy <POLICY> "Handling of non-numeric stats")
                        .default_value("reject")
                        .value_parser(["reject", "zero"]),
                )
                .arg(output()),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "ascension", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "ascension", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "ascension", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "ascension", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
