//! `passnote generate` — print a random password.

use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(max_len: usize) -> Result<()> {
    let password = generate_password(max_len)?;
    println!("{}", password.as_str());
    Ok(())
}
