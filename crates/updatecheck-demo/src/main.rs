//! Minimal host program that shows an update notice before exiting.
//!
//! ```text
//! updatecheck-demo <application> <version> [--production] [--endpoint <url>] [--verbose]
//! ```

mod logging;

use clap::Parser;
use log::debug;
use updatecheck::{Application, CheckOptions, UpdateNotifier};

#[derive(Parser, Debug)]
#[command(
    name = "updatecheck-demo",
    version,
    about = "Check for a newer release of an application and print the notice",
    long_about = None,
)]
struct Args {
    /// Application identifier sent to the update checker, e.g. "granted".
    application: String,

    /// Version of the application currently running.
    #[arg(id = "current_version", value_name = "VERSION")]
    version: String,

    /// Query the production endpoint instead of the development one.
    #[arg(long)]
    production: bool,

    /// Show debug logging, including why a check was skipped or failed.
    #[arg(long, short)]
    verbose: bool,

    /// Override the update checker URL.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

impl Args {
    fn check_options(&self) -> CheckOptions {
        let options = CheckOptions::new().caller(env!("CARGO_PKG_NAME"));
        match &self.endpoint {
            Some(endpoint) => options.endpoint(endpoint.clone()),
            None => options,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logging::init_logging(args.verbose);

    let notifier = UpdateNotifier::new();
    let outcome = notifier.check(
        &Application::new(args.application.as_str()),
        &args.version,
        args.production,
        &args.check_options(),
    );
    debug!("update check outcome: {outcome:?}");

    // The host's real work would run here.

    notifier.print().await;
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::Args;

    #[test]
    fn parses_flags_and_positionals() {
        let args = Args::try_parse_from([
            "updatecheck-demo",
            "--production",
            "granted",
            "0.20.0",
            "--endpoint=http://localhost:8080/check",
        ])
        .expect("arguments should parse");

        assert_eq!(args.application, "granted");
        assert_eq!(args.version, "0.20.0");
        assert!(args.production);
        assert!(!args.verbose);
        assert_eq!(
            args.endpoint.as_deref(),
            Some("http://localhost:8080/check")
        );
    }

    #[test]
    fn short_verbose_flag_is_accepted() {
        let args = Args::try_parse_from(["updatecheck-demo", "-v", "granted", "1.0.0"])
            .expect("arguments should parse");

        assert!(args.verbose);
        assert!(!args.production);
        assert!(args.endpoint.is_none());
    }

    #[test]
    fn rejects_missing_version() {
        let error = Args::try_parse_from(["updatecheck-demo", "granted"])
            .expect_err("version is required");
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_endpoint_without_value() {
        let error = Args::try_parse_from(["updatecheck-demo", "granted", "1.0.0", "--endpoint"])
            .expect_err("endpoint needs a value");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_unknown_flags_and_extra_arguments() {
        let error = Args::try_parse_from(["updatecheck-demo", "--force", "granted", "1.0.0"])
            .expect_err("unknown flag should fail");
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);

        let error = Args::try_parse_from(["updatecheck-demo", "granted", "1.0.0", "extra"])
            .expect_err("extra positional should fail");
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }
}
