/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the Secure Memory Zone emulator.

--*/

use anyhow::{anyhow, bail, Context};
use clap::{arg, value_parser, ArgAction, ArgMatches};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use smz_drivers::Smz;
use smz_emu_bus::Ram;
use smz_emu_periph::{BusInterceptor, KeystreamMode};
use std::process::exit;

mod emu_csr;
mod scenario;

use emu_csr::EmuCsr;
use scenario::{ImageReport, PassthroughReport};

/// Address used for the passthrough check
const PLAIN_ADDR: u32 = 0x0;

/// Accepts `0x`-prefixed hex or decimal
fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("'{s}' is not a 32-bit value: {e}"))
}

fn command() -> clap::Command<'static> {
    clap::Command::new("smz-emu")
        .about("Secure Memory Zone emulator")
        .arg(
            arg!(--base <ADDR> "Secure region base address")
                .required(false)
                .default_value("0x10000")
                .value_parser(parse_u32),
        )
        .arg(
            arg!(--size <BYTES> "Secure region size, a power of two")
                .required(false)
                .default_value("0x1000")
                .value_parser(parse_u32),
        )
        .arg(
            arg!(--mode <MODE> "Keystream derivation")
                .required(false)
                .default_value("address")
                .value_parser(["address", "keys"]),
        )
        .arg(
            arg!(--key <WORD> "Key word, repeat up to four times")
                .required(false)
                .action(ArgAction::Append)
                .value_parser(parse_u32),
        )
        .arg(
            arg!(--words <COUNT> "Image length in words")
                .required(false)
                .default_value("196")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--"ram-size" <BYTES> "Emulated RAM size")
                .required(false)
                .default_value("0x20000")
                .value_parser(parse_u32),
        )
        .arg(
            arg!(--"log-level" <LEVEL> "Log level")
                .required(false)
                .default_value("info")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"]),
        )
}

/// Emulator settings taken from the command line
struct Settings {
    base: u32,
    size: u32,
    mode: KeystreamMode,
    keys: [u32; 4],
    words: u32,
    ram_size: u32,
}

impl Settings {
    fn from_args(args: &ArgMatches) -> anyhow::Result<Self> {
        let get = |name: &str| {
            args.get_one::<u32>(name)
                .copied()
                .with_context(|| format!("{name} arg not specified"))
        };

        let mode = args
            .get_one::<String>("mode")
            .with_context(|| "mode arg not specified")?
            .parse::<KeystreamMode>()?;

        let given: Vec<u32> = args
            .get_many::<u32>("key")
            .map(|keys| keys.copied().collect())
            .unwrap_or_default();
        if given.len() > 4 {
            bail!("at most four key words may be given, got {}", given.len());
        }
        let mut keys = [0u32; 4];
        keys[..given.len()].copy_from_slice(&given);

        Ok(Self {
            base: get("base")?,
            size: get("size")?,
            mode,
            keys,
            words: get("words")?,
            ram_size: get("ram-size")?,
        })
    }
}

fn print_image(report: &ImageReport) {
    println!("Image round trip");
    println!(
        "  Wrote and read {} words at 0x{:08x}",
        report.words, report.base
    );
    for (plain, stored) in &report.at_rest {
        println!("  Plaintext 0x{plain:08x} stored as 0x{stored:08x}");
    }
    println!("  Matching words: {} / {}", report.matches, report.words);
    if report.passed() {
        println!("PASS: image decrypted correctly");
    } else {
        println!("FAIL: {} mismatches", report.words - report.matches);
        if let Some(m) = report.first_mismatch {
            println!("  First mismatch at word {}:", m.index);
            println!("    Expected: 0x{:08x}", m.expected);
            println!("    Got:      0x{:08x}", m.actual);
        }
    }
}

fn print_passthrough(report: &PassthroughReport) {
    println!("Passthrough at 0x{:08x}", report.addr);
    println!("  Read back: 0x{:08x}", report.read_back);
    match report.stored {
        Some(stored) => println!("  Stored:    0x{stored:08x}"),
        None => println!("  Stored:    <outside RAM>"),
    }
    println!(
        "{}",
        if report.passed() {
            "PASS: stored and returned unmodified"
        } else {
            "FAIL: passthrough altered the data"
        }
    );
}

fn run(settings: &Settings) -> anyhow::Result<bool> {
    let ram = Ram::with_size(settings.ram_size as usize);
    let mut smz = BusInterceptor::new(ram, settings.mode);
    log::info!(
        "emu: {} bytes of RAM, {} keystream",
        settings.ram_size,
        settings.mode
    );

    let mut driver = Smz::new(EmuCsr::new(smz.regs_mut()));
    driver
        .set_keys(&settings.keys)
        .map_err(|e| anyhow!("loading keys failed: {e:?}"))?;
    driver
        .init(settings.base, settings.size, true)
        .map_err(|e| {
            anyhow!(
                "configuring base {:#010x} size {:#x} failed: {e:?} ({:#010x})",
                settings.base,
                settings.size,
                e.code()
            )
        })?;
    let config = driver
        .config()
        .map_err(|e| anyhow!("reading configuration failed: {e:?}"))?;
    println!("{config}\n");

    let image = scenario::run_image(&mut smz, settings.base, settings.words)
        .with_context(|| "image round trip faulted")?;
    print_image(&image);
    println!();

    let passthrough = scenario::run_passthrough(&mut smz, PLAIN_ADDR)
        .with_context(|| "passthrough access faulted")?;
    print_passthrough(&passthrough);

    Ok(image.passed() && passthrough.passed())
}

fn main() {
    let args = command().get_matches();

    let level = args
        .get_one::<String>("log-level")
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    let _ = SimpleLogger::new().with_level(level).init();

    let result = Settings::from_args(&args).and_then(|settings| run(&settings));
    match result {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            log::error!("Error: {e:#}");
            exit(2);
        }
    }
}
