use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};

use log::error;

use super::LoadError;

pub type KeyValues = BTreeMap<String, String>;

pub fn read(input: impl Read) -> Result<KeyValues, LoadError> {
    let mut kv = KeyValues::new();

    for line in BufReader::new(input).lines() {
        let line = line.map_err(|e| {
            error!("couldn't read line: {e}");
            LoadError::Internal
        })?;

        if line.is_empty() {
            continue;
        }

        let (k, v) = line.split_once(':').ok_or_else(|| {
            error!("invalid line, can't split");
            LoadError::Internal
        })?;

        let v = v.strip_prefix(' ').ok_or_else(|| {
            error!("invalid line - no whitespace after colon");
            LoadError::Internal
        })?;

        kv.insert(k.into(), v.into());
    }

    Ok(kv)
}

/// Every pair must fit on one line for [`read`] to get it back.
pub fn check(keyvalues: &KeyValues) -> io::Result<()> {
    for (k, v) in keyvalues {
        if k.contains(':') || k.contains('\n') || v.contains('\n') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("can't store \"{k}\" as a single line"),
            ));
        }
    }
    Ok(())
}

pub fn write(mut output: impl Write, keyvalues: &KeyValues) -> io::Result<()> {
    check(keyvalues)?;

    for (k, v) in keyvalues {
        writeln!(output, "{}: {}", k, v)?;
    }
    Ok(())
}
