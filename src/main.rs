//! Pixelveil - hide encrypted messages in images.
//!
//! Encrypts a message with AES-256-CBC and spreads it over the raw channel
//! values of an image.

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Builder;
use pixelveil::crypto::Passphrase;
use pixelveil::storage::HostImage;
use pixelveil::{stego, Error, Result, StegoConfig};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixelveil")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A steganography tool to encrypt text and store it in images",
    long_about = "Encrypts a message with AES-256-CBC and hides it in the pixel data of a lossless image."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message and store it in an image
    Encrypt {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path (default: ./output.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The secret message to add to the image
        #[arg(short, long)]
        message: Option<String>,

        /// The encryption key
        #[arg(short, long, conflicts_with = "ask_key")]
        key: Option<String>,

        /// Prompt for the key instead of passing it on the command line
        #[arg(long)]
        ask_key: bool,
    },

    /// Recover and decrypt a message stored in an image
    Decrypt {
        /// Encrypted image path
        #[arg(short, long)]
        input: PathBuf,

        /// The decryption key
        #[arg(short, long, conflicts_with = "ask_key")]
        key: Option<String>,

        /// Prompt for the key instead of passing it on the command line
        #[arg(long)]
        ask_key: bool,
    },

    /// Show how long a message an image can hold
    Capacity {
        /// Image path
        #[arg(short, long)]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a solid-colour carrier image
    Generate {
        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Width in pixels
        #[arg(long)]
        width: u32,

        /// Height in pixels
        #[arg(long)]
        height: u32,

        /// Fill colour as r,g,b (default: red)
        #[arg(long, default_value = "255,0,0", value_parser = parse_color)]
        color: [u8; 3],
    },
}

fn main() {
    let cli = Cli::parse();
    let config = StegoConfig::new(cli.verbose);
    init_logger(&config);

    if let Err(e) = run(cli, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger(config: &StegoConfig) {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(config.log_level())
        .parse_default_env()
        .init();
}

fn run(cli: Cli, config: &StegoConfig) -> Result<()> {
    config.validate().map_err(Error::InvalidConfig)?;

    match cli.command {
        Commands::Encrypt {
            input,
            output,
            message,
            key,
            ask_key,
        } => {
            let output = config.output_path(output);
            cmd_encrypt(&input, &output, message, key, ask_key)
        }

        Commands::Decrypt {
            input,
            key,
            ask_key,
        } => cmd_decrypt(&input, key, ask_key),

        Commands::Capacity { input, json } => cmd_capacity(&input, json),

        Commands::Generate {
            output,
            width,
            height,
            color,
        } => cmd_generate(&output, width, height, color),
    }
}

fn parse_color(value: &str) -> std::result::Result<[u8; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected r,g,b but got {:?}", value));
    }

    let mut rgb = [0u8; 3];
    for (channel, part) in rgb.iter_mut().zip(parts) {
        *channel = part
            .parse()
            .map_err(|_| format!("{:?} is not a channel value 0-255", part))?;
    }
    Ok(rgb)
}

fn prompt_password(prompt: &str) -> Result<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Ok(password),
        Err(_) => {
            eprint!("{}", prompt);
            io::stderr().flush()?;
            let mut password = String::new();
            io::stdin().read_line(&mut password)?;
            Ok(password.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

fn resolve_passphrase(key: Option<String>, ask_key: bool) -> Result<Passphrase> {
    if ask_key {
        Ok(Passphrase::new(prompt_password("Key: ")?))
    } else {
        Ok(Passphrase::from(key))
    }
}

fn cmd_encrypt(
    input: &Path,
    output: &Path,
    message: Option<String>,
    key: Option<String>,
    ask_key: bool,
) -> Result<()> {
    let message = message.ok_or(Error::EmptyMessage)?;
    let passphrase = resolve_passphrase(key, ask_key)?;

    let report = stego::encrypt_image(input, output, &message, &passphrase)?;

    println!("{}", report.ciphertext);
    eprintln!("Message encryption completed: {}", output.display());

    Ok(())
}

fn cmd_decrypt(input: &Path, key: Option<String>, ask_key: bool) -> Result<()> {
    let passphrase = resolve_passphrase(key, ask_key)?;
    let message = stego::decrypt_image(input, &passphrase)?;

    println!("{}", message);

    Ok(())
}

fn cmd_capacity(input: &Path, json: bool) -> Result<()> {
    let report = stego::image_capacity(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Image Capacity");
    println!("==============");
    println!("Channel slots:    {}", report.total_slots);
    println!("Max message:      {} bytes", report.max_message_bytes);
    match report.spacing_at_max {
        Some(spacing) => println!("Spacing at max:   {}", spacing),
        None => println!("Spacing at max:   - (image too small for any message)"),
    }

    Ok(())
}

fn cmd_generate(output: &Path, width: u32, height: u32, color: [u8; 3]) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidConfig(
            "width and height must be greater than 0".to_string(),
        ));
    }

    let [r, g, b] = color;
    let image = HostImage::solid(width, height, [r, g, b, 255]);
    image.save(output)?;

    println!(
        "Wrote {}x{} carrier to {} ({} slots)",
        width,
        height,
        output.display(),
        image.capacity_slots()
    );

    Ok(())
}
