//! `decode-sms`: print the text of an SMS, given a base64 capture of the modem's `AT+CMGR`
//! response as the only argument.
//!
//! On success, the text goes to stdout without a trailing newline. On failure, stdout stays empty,
//! stderr gets an empty line, and the exit status is 1; set `RUST_LOG=debug` to find out why.

#[macro_use] extern crate log;

use std::env;
use std::io::{self, Write};
use std::process;
use failure::{Error, err_msg};

fn run() -> Result<String, Error> {
    let capture = env::args().nth(1)
        .ok_or_else(|| err_msg("no read response given"))?;
    Ok(sms_pdu_decode::decode_read_response(&capture)?)
}
fn main() {
    env_logger::init();
    let result = run().and_then(|text| {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(text.as_bytes())?;
        lock.flush()?;
        Ok(())
    });
    if let Err(e) = result {
        debug!("decoding failed: {}", e);
        eprintln!();
        process::exit(1);
    }
}
