use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSPHRASE_ENV: &str = "KEYDGEN_PASSPHRASE";

/// Reads the passphrase the key is derived from, as raw bytes.
///
/// Trailing newlines are stripped, every other byte is kept: a stray space
/// yields a different key.
pub fn read_passphrase() -> Result<Zeroizing<Vec<u8>>> {
    //  Environment Variable
    //  KEYDGEN_PASSPHRASE="correct horse" ssh-keydgen -t ed25519
    if let Some(pw) = std::env::var_os(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw.into_encoded_bytes()));
        }
    }

    //  stdin (Pipeline), not required to be UTF-8
    //  printf "%s" "$PASSPHRASE" | ssh-keydgen -t ed25519
    if !io::stdin().is_terminal() {
        let mut pw = Zeroizing::new(Vec::new());
        io::stdin().lock().read_until(b'\n', &mut pw)?;
        trim_newline(&mut pw);

        if !pw.is_empty() {
            return Ok(pw);
        }
        bail!("No passphrase provided");
    }

    //  Interactive (TTY), entered twice
    let pw1 = Zeroizing::new(rpassword::prompt_password("Enter passphrase: ")?.into_bytes());
    if pw1.is_empty() {
        bail!("passphrase cannot be empty");
    }

    let pw2 = rpassword::prompt_password("Enter same passphrase again: ")?;
    let pw2 = Zeroizing::new(pw2.into_bytes());
    if pw1 != pw2 {
        bail!("passphrases do not match");
    }

    Ok(pw1)
}

fn trim_newline(pw: &mut Vec<u8>) {
    while let Some(b'\n' | b'\r') = pw.last() {
        pw.pop();
    }
}
