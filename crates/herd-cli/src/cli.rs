use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "herd",
    about = "Herdbook — ledger-backed animal records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// World-state snapshot file (overrides the config file)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, default_value = "herd.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the ledger initialization hook
    Init,
    /// Create a new animal record
    Create(RecordArgs),
    /// Print the stored encoding of an animal
    Read(IdArgs),
    /// Check whether an animal exists
    Exists(IdArgs),
    /// Change only the name of an animal
    Rename(RenameArgs),
    /// Replace every field of an animal
    Update(RecordArgs),
    /// Delete an animal
    Delete(IdArgs),
    /// List every stored value
    List,
    /// Print the digest of an animal's canonical encoding
    Digest(IdArgs),
    /// Invoke a transaction by name with string arguments
    Invoke(InvokeArgs),
    /// List the available transactions
    Transactions,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    pub new_name: String,
}

#[derive(Args)]
pub struct RecordArgs {
    pub id: String,
    pub name: String,
    #[arg(value_name = "TYPE")]
    pub kind: String,
    pub breed: String,
    pub birth_date: String,
    pub description: String,
    pub img_url: String,
    /// `true` or `false`
    pub pedigree: String,
}

impl RecordArgs {
    /// Positional arguments in transaction order.
    pub fn into_args(self) -> Vec<String> {
        vec![
            self.id,
            self.name,
            self.kind,
            self.breed,
            self.birth_date,
            self.description,
            self.img_url,
            self.pedigree,
        ]
    }
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create() {
        let cli = Cli::try_parse_from([
            "herd", "create", "a1", "Rex", "Dog", "Lab", "2020-01-01", "desc", "http://x", "true",
        ])
        .unwrap();
        match cli.command {
            Command::Create(args) => {
                let args = args.into_args();
                assert_eq!(args.len(), 8);
                assert_eq!(args[2], "Dog");
                assert_eq!(args[7], "true");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn parses_globals() {
        let cli = Cli::try_parse_from([
            "herd", "list", "--state", "s.json", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(cli.state, Some(PathBuf::from("s.json")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("herd.toml"));
    }

    #[test]
    fn parses_invoke_with_trailing_args() {
        let cli = Cli::try_parse_from(["herd", "invoke", "ReadAnimal", "a1"]).unwrap();
        match cli.command {
            Command::Invoke(args) => {
                assert_eq!(args.function, "ReadAnimal");
                assert_eq!(args.args, vec!["a1".to_string()]);
            }
            _ => panic!("expected invoke"),
        }
    }

    #[test]
    fn create_requires_all_fields() {
        assert!(Cli::try_parse_from(["herd", "create", "a1", "Rex"]).is_err());
    }
}
