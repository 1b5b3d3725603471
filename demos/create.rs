//! Creates an archive from one or more input files.
//!
//! To create a new archive, run:
//!
//! ```shell
//! cargo run --example create <path/to/output.a> <path/to/input1> <input2..>
//! ```
//!
//! Assuming the output file doesn't already exist, this is roughly equivalent
//! to running:
//!
//! ```shell
//! ar -crD <path/to/output.a> <path/to/input1> <input2..>
//! ```
//!
//! Set `RUST_LOG=debug` to see what the writer does.

use ar_stream::{Header, Writer};

use std::env;
use std::error::Error;
use std::fs::File;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: create <outpath> <inpath> [<inpath>...]");
        return Ok(());
    }

    let mut writer = Writer::new(File::create(&args[1])?);
    writer.set_deterministic(true);
    for input_path in &args[2..] {
        let input_path = Path::new(input_path);
        let name = input_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| format!("{:?} has no usable file name", input_path))?;
        let file = File::open(input_path)?;
        let header = Header::from_metadata(name, &file.metadata()?);
        writer
            .append(&header, file)
            .map_err(|err| format!("failed to add {:?} to archive: {}", input_path, err))?;
    }
    writer.close()?;
    Ok(())
}
