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

//! Provides an easy way to access the fragments of a network, whether they
//! are in a directory or in a zip archive.

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Allows files in a directory or ZipArchive to be read either
pub trait FileHandler
where
    Self: std::marker::Sized,
{
    /// Reader
    type Reader: Read;

    /// Return a file if exist
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)>;

    /// Return a file or an error if not exist
    fn get_file(self, name: &str) -> Result<(Self::Reader, PathBuf)> {
        let (reader, path) = self.get_file_if_exists(name)?;
        Ok((
            reader.ok_or_else(|| anyhow!("file {:?} not found", path))?,
            path,
        ))
    }

    /// Names of the files available, in lexical order
    fn file_names(self) -> Vec<String>;

    /// Allows to have nicer error messages
    fn source_name(&self) -> String;
}

/// PathFileHandler is used to read files for a directory
pub struct PathFileHandler<P: AsRef<Path>> {
    base_path: P,
}

impl<P: AsRef<Path>> PathFileHandler<P> {
    /// Constructs a new PathFileHandler
    pub fn new(path: P) -> Self {
        PathFileHandler { base_path: path }
    }
}

impl<'a, P: AsRef<Path>> FileHandler for &'a mut PathFileHandler<P> {
    type Reader = File;
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)> {
        let f = self.base_path.as_ref().join(name);
        if f.exists() {
            Ok((
                Some(File::open(&f).with_context(|| format!("Error reading {:?}", &f))?),
                f,
            ))
        } else {
            Ok((None, f))
        }
    }
    fn file_names(self) -> Vec<String> {
        let base_path = self.base_path.as_ref();
        let mut names: Vec<String> = WalkDir::new(base_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(base_path).ok()?;
                relative.to_str().map(|name| name.replace('\\', "/"))
            })
            .collect();
        names.sort();
        names
    }
    fn source_name(&self) -> String {
        self.base_path.as_ref().to_string_lossy().into_owned()
    }
}

/// ZipHandler is a wrapper around a ZipArchive
/// It provides a way to access the archive's file by their names
///
/// Unlike ZipArchive, it gives access to a file by its name not regarding its path in the ZipArchive
/// It thus cannot be correct if there are 2 files with the same name in the archive,
/// but it makes it possible to handle a zip with a sub directory
pub struct ZipHandler<R: Seek + Read> {
    archive: zip::ZipArchive<R>,
    archive_path: PathBuf,
    index_by_name: BTreeMap<String, usize>,
}

impl<R> ZipHandler<R>
where
    R: Seek + Read,
{
    /// Constructs a new ZipHandler
    pub fn new<P: AsRef<Path>>(r: R, path: P) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(r)?;
        Ok(ZipHandler {
            index_by_name: Self::files_by_name(&mut archive),
            archive,
            archive_path: path.as_ref().to_path_buf(),
        })
    }

    fn files_by_name(archive: &mut zip::ZipArchive<R>) -> BTreeMap<String, usize> {
        (0..archive.len())
            .filter_map(|i| {
                let file = archive.by_index(i).ok()?;
                if file.is_dir() {
                    return None;
                }
                // we get the name of the file, not regarding its path in the ZipArchive
                let real_name = Path::new(file.name()).file_name()?;
                let real_name: String = real_name.to_str()?.into();
                Some((real_name, i))
            })
            .collect()
    }
}

impl<'a, R> FileHandler for &'a mut ZipHandler<R>
where
    R: Seek + Read,
{
    type Reader = Cursor<Vec<u8>>;
    fn get_file_if_exists(self, name: &str) -> Result<(Option<Self::Reader>, PathBuf)> {
        let p = self.archive_path.join(name);
        match self.index_by_name.get(name) {
            None => Ok((None, p)),
            Some(i) => {
                let mut content = Vec::new();
                self.archive
                    .by_index(*i)?
                    .read_to_end(&mut content)
                    .with_context(|| format!("Error reading {:?}", p))?;
                Ok((Some(Cursor::new(content)), p))
            }
        }
    }
    fn file_names(self) -> Vec<String> {
        self.index_by_name.keys().cloned().collect()
    }
    fn source_name(&self) -> String {
        self.archive_path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Read, Write};

    #[test]
    fn path_file_handler() {
        let tmp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp_dir.path().join("folder")).unwrap();
        std::fs::write(tmp_dir.path().join("hello.lin"), "hello\n").unwrap();
        std::fs::write(tmp_dir.path().join("folder/world.link"), "world\n").unwrap();
        let mut file_handler = PathFileHandler::new(tmp_dir.path().to_path_buf());

        let (mut hello, _) = file_handler.get_file("hello.lin").unwrap();
        let mut hello_str = String::new();
        hello.read_to_string(&mut hello_str).unwrap();
        assert_eq!("hello\n", hello_str);

        assert!(file_handler.get_file("missing.lin").is_err());
        assert_eq!(
            vec!["folder/world.link".to_string(), "hello.lin".to_string()],
            file_handler.file_names()
        );
    }

    #[test]
    fn zip_file_handler() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("network/muni.lin", options).unwrap();
            zip.write_all(b"LINE NAME=\"10\", N=1, 2\n").unwrap();
            zip.start_file("bart.lin", options).unwrap();
            zip.write_all(b"LINE NAME=\"BART\", N=3, 4\n").unwrap();
            zip.finish().unwrap();
        }
        buffer.set_position(0);
        let mut file_handler = ZipHandler::new(buffer, "network.zip").unwrap();

        {
            let (mut muni, path) = file_handler.get_file("muni.lin").unwrap();
            let mut muni_str = String::new();
            muni.read_to_string(&mut muni_str).unwrap();
            assert_eq!("LINE NAME=\"10\", N=1, 2\n", muni_str);
            assert_eq!(PathBuf::from("network.zip/muni.lin"), path);
        }

        assert_eq!(
            vec!["bart.lin".to_string(), "muni.lin".to_string()],
            file_handler.file_names()
        );
    }
}
