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

//! Writing of a network back to Cube files.

use crate::configuration::WritePolicy;
use crate::error::Error;
use crate::network::{FileFamily, Network};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes `content` to `path` according to `policy`. Returns whether the file
/// was written.
pub fn write_text(path: &Path, content: &str, policy: WritePolicy) -> Result<bool> {
    if path.exists() {
        match policy {
            WritePolicy::Overwrite => {}
            WritePolicy::Skip => {
                warn!("Skipping {:?} which already exists", path);
                return Ok(false);
            }
            WritePolicy::Abort => return Err(Error::FileExists(path.to_path_buf()).into()),
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Error creating {:?}", parent))?;
    }
    fs::write(path, content).with_context(|| format!("Error writing {:?}", path))?;
    Ok(true)
}

/// Under `WritePolicy::Abort`, fails when any of `paths` exists, so that
/// nothing gets written.
pub fn check_targets<I, P>(paths: I, policy: WritePolicy) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    if policy != WritePolicy::Abort {
        return Ok(());
    }
    match paths.into_iter().find(|path| path.as_ref().exists()) {
        Some(path) => Err(Error::FileExists(path.as_ref().to_path_buf()).into()),
        None => Ok(()),
    }
}

/// Writes one `{base_name}.{suffix}` file per family holding records or
/// comments into `dir`, which is created when needed. Returns the written
/// files.
pub fn write<P: AsRef<Path>>(
    network: &Network,
    dir: P,
    base_name: &str,
    policy: WritePolicy,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let targets: Vec<(FileFamily, String)> = FileFamily::ALL
        .iter()
        .copied()
        .filter(|family| !network.is_family_empty(*family))
        .map(|family| (family, format!("{}.{}", base_name, family.extension())))
        .collect();
    check_targets(targets.iter().map(|(_, file)| dir.join(file)), policy)?;
    fs::create_dir_all(dir).with_context(|| format!("Error creating {:?}", dir))?;
    let mut written = Vec::new();
    for (family, file) in targets {
        let path = dir.join(&file);
        info!(file_name = %file, "Writing");
        if write_text(&path, &network.serialize(family), policy)? {
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Supplink, TransitLine, TransitLink};
    use pretty_assertions::assert_eq;

    fn network() -> Network {
        let mut network = Network::new("test");
        let mut line = TransitLine::new("10");
        line.nodes = vec![crate::objects::Node::new(1), crate::objects::Node::new(2)];
        network.lines.push(line);
        network.links.push(TransitLink::new(1, 2));
        network.supplinks.push(Supplink::new(2, 3));
        network
    }

    #[test]
    fn links_and_supplinks_share_a_file() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let dir = tmp_dir.path().join("out");
        let written = write(&network(), &dir, "muni", WritePolicy::Abort).unwrap();
        assert_eq!(vec![dir.join("muni.lin"), dir.join("muni.link")], written);
        let links = fs::read_to_string(dir.join("muni.link")).unwrap();
        assert_eq!("LINK NODES=1-2\nSUPPLINK N=2-3\n", links);
    }

    #[test]
    fn existing_files() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let network = network();
        write(&network, tmp_dir.path(), "muni", WritePolicy::Abort).unwrap();
        let err = write(&network, tmp_dir.path(), "muni", WritePolicy::Abort).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FileExists(_))
        ));
        assert!(write(&network, tmp_dir.path(), "muni", WritePolicy::Skip)
            .unwrap()
            .is_empty());
        assert_eq!(
            2,
            write(&network, tmp_dir.path(), "muni", WritePolicy::Overwrite)
                .unwrap()
                .len()
        );
    }

    #[test]
    fn abort_writes_nothing_when_a_later_file_exists() {
        let tmp_dir = tempfile::tempdir().unwrap();
        fs::write(tmp_dir.path().join("muni.link"), "; kept\n").unwrap();
        let err = write(&network(), tmp_dir.path(), "muni", WritePolicy::Abort).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FileExists(path)) if path.ends_with("muni.link")
        ));
        assert!(!tmp_dir.path().join("muni.lin").exists());
        assert_eq!(
            "; kept\n",
            fs::read_to_string(tmp_dir.path().join("muni.link")).unwrap()
        );
    }
}
