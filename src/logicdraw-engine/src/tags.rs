// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Signal tags referenced by inputs and outputs.
//!
//! Tag files are `;`-delimited tables with the header
//! `Id;Designation;Signal;Condition;Description`.

use serde::{Deserialize, Serialize};

/// Tag id meaning "no tag" in element records.
pub const NO_TAG: i32 = -1;

/// Field separator of tag files.
pub const TAG_DELIMITER: u8 = b';';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Designation")]
    pub designation: String,
    #[serde(rename = "Signal")]
    pub signal: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagTable {
    tags: Vec<Tag>,
}

impl TagTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Look up a tag reference.  [`NO_TAG`] and unknown ids resolve to
    /// nothing.
    pub fn get(&self, id: i32) -> Option<&Tag> {
        if id == NO_TAG {
            return None;
        }
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Add a tag, replacing any tag with the same id.
    pub fn insert(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.id == tag.id) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

impl FromIterator<Tag> for TagTable {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut table = TagTable::new();
        for tag in iter {
            table.insert(tag);
        }
        table
    }
}

#[cfg(feature = "file_io")]
mod file {
    use std::io::{Read, Write};
    use std::path::Path;

    use super::{TAG_DELIMITER, Tag, TagTable};
    use crate::common::Result;
    use crate::io_err;

    impl TagTable {
        pub fn from_reader<R: Read>(reader: R) -> Result<TagTable> {
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(TAG_DELIMITER)
                .trim(csv::Trim::All)
                .from_reader(reader);
            let mut table = TagTable::new();
            for result in rdr.deserialize::<Tag>() {
                match result {
                    Ok(tag) => table.insert(tag),
                    Err(err) => return io_err!(TagFile, err.to_string()),
                }
            }
            Ok(table)
        }

        pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(TAG_DELIMITER)
                .from_writer(writer);
            for tag in self.iter() {
                if let Err(err) = wtr.serialize(tag) {
                    return io_err!(TagFile, err.to_string());
                }
            }
            if let Err(err) = wtr.flush() {
                return io_err!(TagFile, err.to_string());
            }
            Ok(())
        }

        pub fn load(path: &Path) -> Result<TagTable> {
            match std::fs::File::open(path) {
                Ok(file) => TagTable::from_reader(file),
                Err(err) => io_err!(FileRead, format!("{}: {}", path.display(), err)),
            }
        }

        pub fn save(&self, path: &Path) -> Result<()> {
            match std::fs::File::create(path) {
                Ok(file) => self.to_writer(file),
                Err(err) => io_err!(FileWrite, format!("{}: {}", path.display(), err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: i32, designation: &str) -> Tag {
        Tag {
            id,
            designation: designation.to_owned(),
            signal: "X0.1".to_owned(),
            condition: "1".to_owned(),
            description: "start button".to_owned(),
        }
    }

    #[test]
    fn test_get() {
        let table: TagTable = [tag(0, "S1"), tag(4, "K2")].into_iter().collect();
        assert_eq!("K2", table.get(4).unwrap().designation);
        assert!(table.get(NO_TAG).is_none());
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = TagTable::new();
        table.insert(tag(1, "S1"));
        table.insert(tag(1, "S2"));
        assert_eq!(1, table.len());
        assert_eq!("S2", table.get(1).unwrap().designation);
    }

    #[cfg(feature = "file_io")]
    #[test]
    fn test_read_write() {
        let text = "Id;Designation;Signal;Condition;Description\n\
                    0;S1;X0.1;1;start button\n\
                    7; K2 ;Y0.0;0;motor\n";
        let table = TagTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(2, table.len());
        assert_eq!("K2", table.get(7).unwrap().designation);
        assert_eq!("motor", table.get(7).unwrap().description);

        let mut out = Vec::new();
        table.to_writer(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("Id;Designation;Signal;Condition;Description\n"));
        assert_eq!(table, TagTable::from_reader(written.as_bytes()).unwrap());
    }

    #[cfg(feature = "file_io")]
    #[test]
    fn test_bad_tag_file() {
        let text = "Id;Designation;Signal;Condition;Description\nx;S1;X0.1;1;start\n";
        let err = TagTable::from_reader(text.as_bytes()).unwrap_err();
        assert_eq!(crate::common::ErrorCode::TagFile, err.code);
    }
}
