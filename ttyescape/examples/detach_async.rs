//! Async detach example: forward tokio stdin to stdout until detach.
//!
//! # Usage
//!
//! ```bash
//! stty raw -echo; cargo run --example detach_async -- ctrl-]; stty sane
//! ```

use std::env;

use ttyescape::{AsyncEscapeProxy, EscapeKeys, End, forward::forward_async};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let keys: EscapeKeys = env::args().nth(1).as_deref().unwrap_or("ctrl-]").parse()?;
    log::info!("type {} to detach", keys);

    let mut input = AsyncEscapeProxy::new(tokio::io::stdin(), keys);
    let mut output = tokio::io::stdout();

    let forwarded = forward_async(&mut input, &mut output).await?;
    match forwarded.end {
        End::Detached => log::info!("detached after {} bytes", forwarded.bytes),
        End::Eof => log::info!("stdin closed after {} bytes", forwarded.bytes),
    }

    Ok(())
}
