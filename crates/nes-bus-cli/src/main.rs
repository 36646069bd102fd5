#![forbid(unsafe_code)]

//! Debugging harness for `nes_bus`: builds a 16-bit bus out of RAM regions given on the command
//! line, applies writes, performs reads and optionally prints the page map.

use std::cell::Cell;
use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use nes_bus::{Address, Bus16, Device, MemoryMappedDevice, Ram};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Map RAM regions into a 16-bit bus and read/write through it")]
struct Args {
    /// Map a zero- (or FILL-) initialised RAM region of LEN bytes at ADDR. Repeatable.
    #[arg(long = "map", value_name = "ADDR:LEN[:FILL]", value_parser = parse_region)]
    maps: Vec<Region>,

    /// Write hex bytes at ADDR, e.g. `0x6000:deadbeef`. Repeatable; applied in order after mapping.
    #[arg(long = "write", value_name = "ADDR:HEX", value_parser = parse_poke)]
    writes: Vec<Poke>,

    /// Read LEN bytes at ADDR and print them as hex. Repeatable; performed after all writes.
    #[arg(long = "read", value_name = "ADDR:LEN", value_parser = parse_peek)]
    reads: Vec<Peek>,

    /// Print the page map after all transfers.
    #[arg(long)]
    dump_map: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    address: Address,
    len: usize,
    fill: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Poke {
    address: Address,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Peek {
    address: Address,
    len: usize,
}

/// Parses `0x`-prefixed hex or plain decimal.
fn parse_number(s: &str) -> Result<u64> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid number `{s}`"))
}

fn parse_address(s: &str) -> Result<Address> {
    let value = parse_number(s)?;
    Address::try_from(value).map_err(|_| anyhow!("address `{s}` is too large"))
}

fn parse_len(s: &str) -> Result<usize> {
    let value = parse_number(s)?;
    usize::try_from(value).map_err(|_| anyhow!("length `{s}` is too large"))
}

fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        bail!("hex byte string `{s}` has an odd number of digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| anyhow!("invalid hex byte string `{s}`"))
        })
        .collect()
}

fn parse_region(s: &str) -> Result<Region> {
    let mut parts = s.split(':');
    let (Some(address), Some(len)) = (parts.next(), parts.next()) else {
        bail!("expected ADDR:LEN[:FILL], got `{s}`");
    };
    let fill = match parts.next() {
        Some(fill) => u8::try_from(parse_number(fill)?)
            .map_err(|_| anyhow!("fill byte `{fill}` does not fit in a byte"))?,
        None => 0,
    };
    if parts.next().is_some() {
        bail!("expected ADDR:LEN[:FILL], got `{s}`");
    }
    Ok(Region {
        address: parse_address(address)?,
        len: parse_len(len)?,
        fill,
    })
}

fn parse_poke(s: &str) -> Result<Poke> {
    let (address, bytes) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected ADDR:HEX, got `{s}`"))?;
    Ok(Poke {
        address: parse_address(address)?,
        bytes: parse_hex_bytes(bytes)?,
    })
}

fn parse_peek(s: &str) -> Result<Peek> {
    let (address, len) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected ADDR:LEN, got `{s}`"))?;
    Ok(Peek {
        address: parse_address(address)?,
        len: parse_len(len)?,
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Executes `args` against a fresh bus, writing read results and the map dump to `out`.
///
/// Returns the number of faults raised during transfers.
fn run(args: &Args, out: &mut impl Write) -> Result<usize> {
    let devices: Vec<Ram> = args
        .maps
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let ram = Ram::new(format!("ram{i}"), region.len);
            ram.fill(region.fill);
            ram
        })
        .collect();

    let faults = Cell::new(0usize);
    let mut bus = Bus16::new(|address, kind| {
        faults.set(faults.get() + 1);
        tracing::warn!("bus {kind} fault at 0x{address:04x}");
    });

    for (region, ram) in args.maps.iter().zip(&devices) {
        ram.map(&mut bus, region.address).with_context(|| {
            format!(
                "failed to map {} ({} bytes at 0x{:04x})",
                ram.name(),
                region.len,
                region.address
            )
        })?;
    }

    for poke in &args.writes {
        bus.write(poke.address, &poke.bytes);
    }

    for peek in &args.reads {
        let mut buf = vec![0u8; peek.len];
        bus.read(peek.address, &mut buf);
        writeln!(out, "{:04x}: {}", peek.address, hex(&buf))?;
    }

    if args.dump_map {
        write!(out, "{}", bus.dump_map())?;
    }
    bus.log_map();

    Ok(faults.get())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let stdout = io::stdout();
    let faults = run(&args, &mut stdout.lock())?;
    if faults > 0 {
        bail!("{faults} bus fault(s) during transfers");
    }
    Ok(())
}
