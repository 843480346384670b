use crate::{
    config::{parse_kind, TomlConfig},
    error::{Context, Error, ResultExt},
};
use clap::{Parser, Subcommand};
use crypto_common::erase::Erase;
use mpw::{Memory, Mpw, PasswordType, Scope};
use std::{
    io::{BufRead, IsTerminal, Write},
    path::PathBuf,
};

#[derive(Debug, Parser)]
#[clap(about, version = crate::EXPANDED_VERSION)]
#[clap(help_template = r"{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}")]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Command,
    /// path to the configuration file (default=$HOME/.mpwgen.toml)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// generate a site password
    #[clap(alias = "g")]
    Generate(GenerateArgs),
    /// derive the user name for a site
    User(SiteArgs),
    /// derive a recovery answer for a site
    Answer(AnswerArgs),
    /// show version information
    Version,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// site name
    pub site: String,
    #[clap(flatten)]
    pub common: CommonArgs,
    /// site counter; bump it to rotate the password
    #[clap(short = 'n', long, default_value = "1")]
    pub counter: u32,
    /// password shape: maximum|long|medium|basic|short|pin|name|phrase|raw
    #[clap(short, long)]
    pub kind: Option<String>,
}

#[derive(Debug, Parser)]
pub struct SiteArgs {
    /// site name
    pub site: String,
    #[clap(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Parser)]
pub struct AnswerArgs {
    /// site name
    pub site: String,
    #[clap(flatten)]
    pub common: CommonArgs,
    /// security-question keyword, e.g. "maiden"
    #[clap(short = 'x', long)]
    pub context: Option<String>,
}

#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// your full name (overrides the config file)
    #[clap(short, long)]
    pub user: Option<String>,
    /// cap key-derivation storage at this many KiB instead of the full
    /// 32 MiB, trading time for memory
    #[clap(long)]
    pub max_kdf_kib: Option<usize>,
    /// report key-derivation progress on stderr
    #[clap(short, long)]
    pub progress: bool,
}

impl Cli {
    pub fn run() -> Result<(), Context> {
        let cli = Self::parse();
        let config = cli.load_config()?;
        match &cli.subcommand {
            Command::Version => {
                println!("{}", crate::EXPANDED_VERSION);
                Ok(())
            }
            Command::Generate(args) => {
                let kind = match &args.kind {
                    Some(s) => parse_kind(s).context("unusable --kind")?,
                    None => config
                        .default_kind()
                        .context("unusable `default_kind` in config file")?
                        .unwrap_or(PasswordType::Long),
                };
                let output = login(&config, &args.common)?.generate(
                    args.site.as_bytes(),
                    args.counter,
                    kind,
                    None,
                    Scope::Authentication,
                )?;
                emit(&output);
                Ok(())
            }
            Command::User(args) => {
                let output = login(&config, &args.common)?.username(args.site.as_bytes())?;
                emit(&output);
                Ok(())
            }
            Command::Answer(args) => {
                let output = login(&config, &args.common)?.recovery(
                    args.site.as_bytes(),
                    args.context.as_deref().map(str::as_bytes),
                )?;
                emit(&output);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<TomlConfig, Context> {
        let config_file = match &self.config {
            Some(config_file) => config_file.clone(),
            None => default_config_file()?,
        };
        if !config_file.exists() {
            tracing::debug!(path = %config_file.display(), "no config file, using defaults");
            return Ok(TomlConfig::empty());
        }
        let raw = std::fs::read_to_string(&config_file).context(format!(
            "while reading config file at '{}'",
            config_file.display()
        ))?;
        let table =
            toml::from_str::<toml::value::Table>(&raw).context("while parsing config file")?;
        Ok(TomlConfig::new(table))
    }
}

fn login(config: &TomlConfig, args: &CommonArgs) -> Result<Mpw, Context> {
    let user = match &args.user {
        Some(user) => user.clone(),
        None => config.user().ok_or(Error::NoUser)?,
    };
    let mut password = read_password()
        .context("failed to read the master password")?
        .into_bytes();
    let memory = args
        .max_kdf_kib
        .map_or_else(Memory::full, |kib| Memory::heap_capped(kib * 1024));
    tracing::debug!(%user, budget_kib = ?args.max_kdf_kib, "deriving master key");

    let mut mpw = Mpw::new();
    let result = if args.progress {
        let mut last = u8::MAX;
        let mut render = move |pct: u8| {
            if pct == last {
                return;
            }
            last = pct;
            eprint!("\rderiving master key... {pct:3}%");
            if pct == 100 {
                eprintln!();
            }
        };
        mpw.login_with(
            user.as_bytes(),
            &password,
            std::process::id(),
            memory,
            Some(&mut render),
        )
    } else {
        mpw.login_with(user.as_bytes(), &password, std::process::id(), memory, None)
    }
    .map(|_| ());
    password.as_mut_slice().erase();
    result?;
    tracing::debug!(token = mpw.login_token()?, "session established");
    Ok(mpw)
}

fn emit(output: &mpw::Output) {
    let printable = output
        .as_str()
        .filter(|s| s.bytes().all(|b| (0x20..0x7f).contains(&b)));
    match printable {
        Some(s) => println!("{s}"),
        None => {
            // raw outputs are key bytes; print them as hex
            let hex: String = output.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
            println!("{hex}");
        }
    }
}

fn read_password() -> std::io::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Master password: ");
        std::io::stderr().flush()?;
    }
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
    }
    if line.ends_with('\n') {
        line.pop();
    }
    if line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn default_config_file() -> Result<PathBuf, Error> {
    #[allow(deprecated)]
    std::env::home_dir()
        .map(|home| home.join(".mpwgen.toml"))
        .ok_or(Error::NoHome)
}
