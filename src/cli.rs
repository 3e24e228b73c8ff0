use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "profile-sweeper")]
#[command(about = "Removes duplicate profile registrations from the registry", long_about = None)]
pub struct Cli {
    /// Desired identity domain prefix; duplicate-path entries whose SID
    /// falls outside it are removed
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub desired_prefix: String,
}
