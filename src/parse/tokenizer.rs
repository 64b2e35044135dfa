use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

use super::TokenizeError;

/// Bytes that separate arguments: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [u8; 5] = [b' ', b'\t', b'\r', b'\n', 0x07];

const INITIAL_CAPACITY: usize = 64;

pub fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}

/// Splits a command line into its arguments.
///
/// Runs of delimiters are collapsed, leading and trailing delimiters are
/// dropped, and nothing else is interpreted: quotes, backslashes and `$`
/// are ordinary bytes. A NUL byte ends the line. Arguments keep their raw
/// bytes, so names that are not UTF-8 reach `chdir` and `execvp` intact.
///
/// Growth of the argument vector is fallible so that running out of memory
/// surfaces as [`TokenizeError::Allocation`] instead of an abort.
pub fn tokenize(line: &[u8]) -> Result<Vec<OsString>, TokenizeError> {
    let line = match line.iter().position(|&b| b == 0) {
        Some(end) => &line[..end],
        None => line,
    };

    let mut args: Vec<OsString> = Vec::new();

    for word in line.split(|&b| is_delimiter(b)).filter(|w| !w.is_empty()) {
        if args.len() == args.capacity() {
            args.try_reserve(INITIAL_CAPACITY)?;
        }

        let mut arg = Vec::new();
        arg.try_reserve_exact(word.len())?;
        arg.extend_from_slice(word);
        args.push(OsString::from_vec(arg));
    }

    Ok(args)
}
