use anyhow::Context;
use clap::Parser;
use flow_tagger::settings::Config;
use log::{info, LevelFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flow-tagger")]
#[command(about = "Tag flow log records by destination port and protocol and count the results")]
struct Cli {
    #[arg(short, long, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Protocol number table (Decimal, Keyword columns)")]
    protocols: Option<PathBuf>,

    #[arg(long, help = "Lookup table (dstport, protocol, tag columns)")]
    lookup: Option<PathBuf>,

    #[arg(short, long, help = "Flow log file")]
    flow_log: Option<PathBuf>,

    #[arg(short, long, help = "Report output path")]
    output: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    print_config: bool,

    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,
}

impl Cli {
    fn resolve_config(&self) -> flow_tagger::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(path) = &self.protocols {
            config.inputs.protocol_table = path.clone();
        }
        if let Some(path) = &self.lookup {
            config.inputs.lookup_table = path.clone();
        }
        if let Some(path) = &self.flow_log {
            config.inputs.flow_log = path.clone();
        }
        if let Some(path) = &self.output {
            config.output.report = path.clone();
        }

        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = cli.resolve_config().context("Failed to load configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml().context("Failed to serialize configuration")?);
        return Ok(());
    }

    let summary = flow_tagger::run(&config).context("Flow log processing failed")?;

    info!(
        "{} records tagged, {} skipped; {} tags, {} port/protocol pairs",
        summary.records_processed,
        summary.records_skipped,
        summary.distinct_tags,
        summary.distinct_port_protocols
    );
    println!("Processing complete. Results saved to {}", summary.report.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("flow-tagger.toml");
        fs::write(
            &path,
            "[inputs]\n\
             flow_log = \"from-file/flows.txt\"\n\
             lookup_table = \"from-file/lookup.csv\"\n\n\
             [output]\n\
             report = \"from-file/report.txt\"\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::try_parse_from(["flow-tagger"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap(), Config::default());
        assert!(!cli.print_config);
        assert!(!cli.debug);
    }

    #[test]
    fn test_flag_beats_file_beats_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());

        let cli = Cli::try_parse_from([
            "flow-tagger",
            "--config",
            config_path.to_str().unwrap(),
            "--lookup",
            "from-flag/lookup.csv",
            "-o",
            "from-flag/report.txt",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        // default
        assert_eq!(config.inputs.protocol_table, Config::default().inputs.protocol_table);
        // file
        assert_eq!(config.inputs.flow_log, PathBuf::from("from-file/flows.txt"));
        // flag over file
        assert_eq!(config.inputs.lookup_table, PathBuf::from("from-flag/lookup.csv"));
        assert_eq!(config.output.report, PathBuf::from("from-flag/report.txt"));
    }

    #[test]
    fn test_flags_without_config_file() {
        let cli = Cli::try_parse_from([
            "flow-tagger",
            "--protocols",
            "p.csv",
            "--flow-log",
            "f.txt",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.inputs.protocol_table, PathBuf::from("p.csv"));
        assert_eq!(config.inputs.flow_log, PathBuf::from("f.txt"));
        assert_eq!(config.output, Config::default().output);
    }

    #[test]
    fn test_printed_config_reflects_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent-inputs.toml");
        fs::write(
            &config_path,
            "[inputs]\nprotocol_table = \"does/not/exist.csv\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "flow-tagger",
            "--print-config",
            "-c",
            config_path.to_str().unwrap(),
            "--output",
            "elsewhere/counts.txt",
        ])
        .unwrap();
        assert!(cli.print_config);

        let config = cli.resolve_config().unwrap();
        let printed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(printed.inputs.protocol_table, PathBuf::from("does/not/exist.csv"));
        assert_eq!(printed.output.report, PathBuf::from("elsewhere/counts.txt"));
        assert!(!printed.inputs.protocol_table.exists());
    }

    #[test]
    fn test_unreadable_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "flow-tagger",
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
        ]);
        assert!(cli.unwrap().resolve_config().is_err());
    }
}
