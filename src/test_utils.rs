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

//! Helpers shared by the tests of the crate and of its binaries.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/// Content of a file, panicking when it cannot be read.
pub fn get_file_content<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let mut output_file = File::open(path).unwrap_or_else(|_| panic!("file {:?} not found", path));
    let mut output_contents = String::new();
    output_file
        .read_to_string(&mut output_contents)
        .unwrap_or_else(|_| panic!("file {:?} is not UTF-8", path));
    output_contents
}

/// Compares the files of `output_dir` with the ones of `work_dir_expected`.
pub fn compare_output_dir_with_expected<P: AsRef<Path>>(
    output_dir: &P,
    files_to_check: Vec<&str>,
    work_dir_expected: &str,
) {
    let output_dir = output_dir.as_ref();
    for filename in files_to_check {
        let output_file_path = output_dir.join(filename);
        let output_contents = get_file_content(output_file_path);

        let expected_file_path = format!("{}/{}", work_dir_expected, filename);
        let expected_contents = get_file_content(expected_file_path);

        assert_eq!(expected_contents, output_contents, "{}", filename);
    }
}

/// Creates `path/file_name` holding `content`.
pub fn create_file_with_content(path: &Path, file_name: &str, content: &str) {
    let file_path = path.join(file_name);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    let mut f = File::create(&file_path).expect("create file");
    f.write_all(content.as_bytes()).expect("write file");
}

/// Runs `func` in a temporary directory, deleted afterwards.
pub fn test_in_tmp_dir<F>(func: F)
where
    F: FnOnce(&Path),
{
    let tmp_dir = tempfile::tempdir().expect("create temp dir");
    {
        let path = tmp_dir.path();
        func(path);
    }
    tmp_dir.close().expect("delete temp dir");
}
