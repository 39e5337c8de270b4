use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};

use proxy_record::codec::{binary, TextCodec, TextFormat, UnknownKindPolicy};
use proxy_record::settings::update_settings_from_file;
use proxy_record::utils::base64::{payload_decode, payload_encode};
use proxy_record::{ProxyKind, Settings};

/// Convert proxy records between text documents and binary transfer payloads
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file (TOML or YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a text document and print the Base64 binary payload
    Encode {
        /// Input file, stdin when omitted
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Text format of the input, overrides the settings file
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Treat unknown kinds as errors instead of mapping them to Unknown
        #[arg(long)]
        strict: bool,

        /// Input holds a list of records
        #[arg(long)]
        list: bool,
    },
    /// Read a Base64 binary payload and print the text document
    Decode {
        /// Input file, stdin when omitted
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Text format of the output, overrides the settings file
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Payload holds a list of records
        #[arg(long)]
        list: bool,
    },
    /// Print every known proxy kind
    Kinds,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Yaml,
    Toml,
}

impl From<FormatArg> for TextFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => TextFormat::Json,
            FormatArg::Yaml => TextFormat::Yaml,
            FormatArg::Toml => TextFormat::Toml,
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn read_input(input: Option<&PathBuf>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn codec_for(format: Option<FormatArg>, strict: bool) -> TextCodec {
    let mut codec = Settings::current().text_codec();
    if let Some(format) = format {
        codec.format = format.into();
    }
    if strict {
        codec.policy = UnknownKindPolicy::Strict;
    }
    codec
}

fn run(command: Command) -> Result<(), BoxError> {
    match command {
        Command::Encode {
            input,
            format,
            strict,
            list,
        } => {
            let codec = codec_for(format, strict);
            let content = read_input(input.as_ref())?;
            let payload = if list {
                let records = codec.decode_list(&content)?;
                info!("Encoding {} records", records.len());
                binary::encode_list(&records)?
            } else {
                binary::encode(&codec.decode(&content)?)?
            };
            println!("{}", payload_encode(&payload));
        }
        Command::Decode {
            input,
            format,
            list,
        } => {
            let codec = codec_for(format, false);
            let payload = payload_decode(&read_input(input.as_ref())?)?;
            let text = if list {
                let records = binary::decode_list(&payload)?;
                info!("Decoded {} records", records.len());
                codec.encode_list(&records)?
            } else {
                codec.encode(&binary::decode(&payload)?)?
            };
            println!("{}", text.trim_end());
        }
        Command::Kinds => {
            for kind in ProxyKind::ALL {
                let class = if kind.is_group() { "group" } else { "proxy" };
                println!("{:<12} {}", kind.name(), class);
            }
        }
    }
    Ok(())
}

fn main() {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    if let Some(config) = args.config.as_deref() {
        if let Err(e) = update_settings_from_file(config) {
            error!("Failed to load settings from {}: {}", config, e);
            std::process::exit(1);
        }
    }

    if let Err(e) = run(args.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}
