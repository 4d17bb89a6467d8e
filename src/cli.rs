//! Command-line arguments and logging setup.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Input file used when neither `--data` nor `HAPPINESS_DATA` is given.
pub const DEFAULT_DATA_PATH: &str = "cleaned_global_happiness_with_iso.csv";

/// CLI arguments for the happiness dashboard
#[derive(Debug, Clone, Parser)]
#[command(
    name = "happiness-dashboard",
    version,
    about = "Explore World Happiness Report scores by country",
    long_about = "Loads a World Happiness Report table (one row per country and year) and shows \
                  a country's score trend and indicator profile next to latest-year rankings, a \
                  tile map and indicator correlations. With --export the charts are written to \
                  PNG files instead of opening a window."
)]
pub struct Args {
    /// CSV file with Country, Year, ISO_Code, Happiness score and the six indicator columns
    #[arg(
        short = 'd',
        long = "data",
        value_name = "PATH",
        env = "HAPPINESS_DATA",
        default_value = DEFAULT_DATA_PATH,
        help = "Happiness table as CSV (Country, Year, ISO_Code, Happiness score and the six \
                indicator columns). Excel workbooks such as \
                cleaned_global_happiness_with_iso.xlsx must be saved as CSV first"
    )]
    pub data_path: PathBuf,

    /// Country selected at startup (defaults to the first alphabetically)
    #[arg(short = 'c', long = "country", value_name = "NAME")]
    pub country: Option<String>,

    /// Write the charts for the selected country to DIR and exit
    #[arg(short = 'e', long = "export", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Width of exported images in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Height of exported images in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.width.max(200), self.height.max(150))
    }

    /// The requested country if the dataset has it, otherwise the first one.
    pub fn initial_country(&self, countries: &[String]) -> Option<String> {
        self.country
            .as_ref()
            .filter(|c| countries.contains(c))
            .or_else(|| countries.first())
            .cloned()
    }
}

/// Set up structured logging based on CLI arguments. `RUST_LOG` wins when set.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("happiness_dashboard={}", args.get_log_level()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["happiness-dashboard", "--data", "data.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["--country", "Finland", "--export", "out", "--width", "640"]);
        assert_eq!(args.data_path, PathBuf::from("data.csv"));
        assert_eq!(args.country.as_deref(), Some("Finland"));
        assert_eq!(args.export_dir, Some(PathBuf::from("out")));
        assert_eq!(args.export_size(), (640, 800));
    }

    #[test]
    fn test_data_help_asks_for_csv() {
        use clap::CommandFactory;

        let command = Args::command();
        let data = command
            .get_arguments()
            .find(|arg| arg.get_id() == "data_path")
            .unwrap();
        let help = data.get_help().unwrap().to_string();
        assert!(help.contains("CSV"));
        assert!(help.contains(".xlsx"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).get_log_level(), "info");
        assert_eq!(parse(&["-v"]).get_log_level(), "debug");
        assert_eq!(parse(&["-vvv"]).get_log_level(), "trace");
        assert_eq!(parse(&["-q"]).get_log_level(), "error");
        assert!(Args::try_parse_from(["happiness-dashboard", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_initial_country() {
        let countries = vec!["Austria".to_string(), "Chile".to_string()];
        assert_eq!(
            parse(&["-c", "Chile"]).initial_country(&countries).as_deref(),
            Some("Chile")
        );
        assert_eq!(
            parse(&["-c", "Narnia"]).initial_country(&countries).as_deref(),
            Some("Austria")
        );
        assert_eq!(parse(&[]).initial_country(&[]), None);
    }
}
