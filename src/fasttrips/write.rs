// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

use crate::configuration::WritePolicy;
use crate::error::Error;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path;
use tracing::{info, warn};

/// Writes `records` to `path/file`; nothing is written for an empty table.
pub fn write_records<T: Serialize>(
    path: &path::Path,
    file: &str,
    records: &[T],
    policy: WritePolicy,
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let path = path.join(file);
    if path.exists() {
        match policy {
            WritePolicy::Overwrite => {}
            WritePolicy::Skip => {
                warn!(file_name = %file, "Skipping existing file");
                return Ok(());
            }
            WritePolicy::Abort => return Err(Error::FileExists(path).into()),
        }
    }
    info!(file_name = %file, "Writing");
    let mut wtr =
        csv::Writer::from_path(&path).with_context(|| format!("Error reading {:?}", path))?;
    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("Error serializing {:?}", path))?;
    }
    wtr.flush()
        .with_context(|| format!("Error reading {:?}", path))?;
    Ok(())
}
