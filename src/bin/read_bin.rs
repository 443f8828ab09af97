use std::io;

use anyhow::Context;
use clap::Parser;

use tiled2bin_verify::cli::DumpCli;
use tiled2bin_verify::writer::hexdump;

fn main() -> anyhow::Result<()> {
    let args = DumpCli::parse();

    let data = hexdump::read(&args.filename)?;
    let name = args.filename.display().to_string();
    hexdump::write_dump(&name, &data, args.width, io::stdout().lock())
        .with_context(|| format!("Dumping {name}"))?;

    Ok(())
}
