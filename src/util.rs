use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads the file at `path` into a string. A missing file is reported as
/// `Ok(None)` rather than as an error; every other I/O failure is returned.
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents))
}
