use std::{fs, path::Path};

use crate::{error::Error, timetable::models::Timetable};

/// Export the timetable as JSON, creating the parent directories if needed
pub fn export(timetable: &Timetable, path: &Path) -> Result<(), Error> {
    let io = |source| Error::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io)?;
    }

    // Two spaces indentation, non-ASCII characters are kept as is
    let data = serde_json::to_string_pretty(timetable)?;
    fs::write(path, data).map_err(io)
}
