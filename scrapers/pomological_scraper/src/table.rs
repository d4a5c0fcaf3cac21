use std::{fs::File, io::Write, path::Path};
use tracing::info;

use crate::{error::Result, types::PaintingRecord};

/// Output columns after the unnamed row index.
pub const COLUMNS: [&str; 7] = [
    "painting_index",
    "fruit",
    "authors",
    "subjects",
    "year",
    "image",
    "thumbnail_image",
];

/// Records in scrape order. Only appended to; rendered as CSV once at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaintingTable {
    records: Vec<PaintingRecord>,
}

impl PaintingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record after the existing rows.
    pub fn push(&mut self, record: PaintingRecord) {
        self.records.push(record);
    }

    /// Appends a page of records, keeping their order.
    pub fn append(&mut self, records: Vec<PaintingRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PaintingRecord] {
        &self.records
    }

    /// Hands the records back in scrape order.
    pub fn into_records(self) -> Vec<PaintingRecord> {
        self.records
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        info!("Writing {} rows to {:?}", self.len(), path);
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![""];
        header.extend(COLUMNS);
        wtr.write_record(&header)?;

        for (idx, record) in self.records.iter().enumerate() {
            wtr.write_record(&[
                idx.to_string().as_str(),
                record.painting_index.as_deref().unwrap_or_default(),
                record.fruit.as_deref().unwrap_or_default(),
                record.authors.as_deref().unwrap_or_default(),
                record.subjects.as_deref().unwrap_or_default(),
                record.year.as_deref().unwrap_or_default(),
                record.image.as_deref().unwrap_or_default(),
                record.thumbnail_image.as_deref().unwrap_or_default(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl FromIterator<PaintingRecord> for PaintingTable {
    fn from_iter<I: IntoIterator<Item = PaintingRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(index: &str, fruit: Option<&str>) -> PaintingRecord {
        let mut record = PaintingRecord {
            painting_index: Some(index.to_string()),
            fruit: fruit.map(str::to_string),
            authors: Some("Newton, Amanda Almira".to_string()),
            subjects: None,
            year: Some("1912".to_string()),
            ..Default::default()
        };
        record.set_thumbnail(format!("https://host/images/thumbnail/{index}.jpg"));
        record
    }

    #[test]
    fn test_write_csv_layout() {
        let table: PaintingTable = vec![record("1", Some("Apple")), record("2", None)]
            .into_iter()
            .collect();

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            ",painting_index,fruit,authors,subjects,year,image,thumbnail_image\n\
             0,1,Apple,\"Newton, Amanda Almira\",,1912,https://host/images/screen/1.jpg,https://host/images/thumbnail/1.jpg\n\
             1,2,,\"Newton, Amanda Almira\",,1912,https://host/images/screen/2.jpg,https://host/images/thumbnail/2.jpg\n"
        );
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watercolors.csv");

        let mut table = PaintingTable::new();
        table.push(record("10", Some("Pear")));
        table.append(vec![record("11", Some("Plum")), record("12", Some("Fig"))]);
        table.write_csv(&path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.len(), COLUMNS.len() + 1);
        assert_eq!(&headers[0], "");

        let rows: Vec<(String, String)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[2].to_string())
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("0".to_string(), "Pear".to_string()),
                ("1".to_string(), "Plum".to_string()),
                ("2".to_string(), "Fig".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let mut out = Vec::new();
        PaintingTable::new().write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ",painting_index,fruit,authors,subjects,year,image,thumbnail_image\n"
        );
    }
}
