//! Extracts every member of an archive into a directory.
//!
//! ```shell
//! cargo run --example extract <path/to/archive.a> [<path/to/outdir>]
//! ```
//!
//! This is roughly equivalent to running `ar -x` inside the output directory.

use ar_stream::Reader;

use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: extract <archive> [<outdir>]");
        return Ok(());
    }
    let out_dir = PathBuf::from(args.get(2).map_or(".", String::as_str));
    fs::create_dir_all(&out_dir)?;

    let mut archive = Reader::new(io::BufReader::new(File::open(&args[1])?));
    while let Some(entry) = archive.next_entry() {
        let mut entry = entry?;
        let name = entry.header().name().to_string();
        let relative = Path::new(&name);
        if name.is_empty()
            || relative.components().any(|part| !matches!(part, Component::Normal(_)))
        {
            eprintln!("skipping {:?}: not a plain relative path", name);
            continue;
        }
        let path = out_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let copied = io::copy(&mut entry, &mut File::create(&path)?)?;
        println!("{} ({} bytes)", name, copied);
    }
    Ok(())
}
