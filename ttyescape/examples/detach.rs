//! Detach example: echo stdin to stdout until the detach keys are typed.
//!
//! Keys are only matched when they arrive one per read, so put the terminal
//! in raw mode first (otherwise the line discipline delivers whole lines).
//!
//! # Usage
//!
//! ```bash
//! stty raw -echo; cargo run --example detach -- --keys ctrl-p,ctrl-q; stty sane
//! ```

use std::env;
use std::io;

use ttyescape::{EscapeKeys, EscapeProxy, forward::forward};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let keys = EscapeKeys::parse(&args.keys)?;

    eprintln!("Echoing stdin, type {} to detach\r", keys);

    let mut input = EscapeProxy::new(io::stdin().lock(), keys);
    let mut output = io::stdout().lock();

    let forwarded = forward(&mut input, &mut output)?;

    if forwarded.is_detached() {
        eprintln!("\r\n[detached after {} bytes]\r", forwarded.bytes);
    } else {
        eprintln!("\r\n[input closed after {} bytes]\r", forwarded.bytes);
    }

    Ok(())
}

struct Args {
    keys: String,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut keys = "ctrl-p,ctrl-q".to_string();

        let mut i = 1;
        while i < args.len() {
            if let "--keys" | "-k" = args[i].as_str() {
                i += 1;
                if i < args.len() {
                    keys = args[i].clone();
                }
            }
            i += 1;
        }

        Self { keys }
    }
}
