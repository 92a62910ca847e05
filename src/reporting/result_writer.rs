//! CSV sink for accepted batch results.
//!
//! The file is opened in append mode and created if missing. The header row is
//! only written when the file is empty, so repeated runs accumulate rows under
//! a single header.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ScanError;

pub struct ResultWriter<W: Write> {
    writer: W,
}

impl ResultWriter<BufWriter<File>> {
    /// Opens `path` for appending and writes `header` if the file is empty.
    pub fn open_append<P: AsRef<Path>>(path: P, header: &str) -> Result<Self, ScanError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        let mut writer = ResultWriter::new(BufWriter::new(file));
        if is_empty {
            writer.write_line(header)?;
            writer.flush()?;
        }
        Ok(writer)
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(writer: W) -> Self {
        ResultWriter { writer }
    }

    /// Writes one row: the seed, the total and one sum per category.
    pub fn write_result(&mut self, seed: i32, total: usize, sums: &[usize]) -> Result<(), ScanError> {
        let mut line = format!("{},{}", seed, total);
        for sum in sums {
            line.push(',');
            line.push_str(&sum.to_string());
        }
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<(), ScanError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ScanError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn rows_are_comma_separated() {
        let mut writer = ResultWriter::new(Vec::new());
        writer.write_result(-7, 12, &[3, 0, 9]).unwrap();
        writer.write_result(8, 0, &[]).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "-7,12,3,0,9\n8,0\n");
    }

    #[test]
    fn header_is_written_once() {
        let path = std::env::temp_dir().join(format!(
            "terrain_scanner_header_{}.csv",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let mut writer = ResultWriter::open_append(&path, "seed,total").unwrap();
            writer.write_result(1, 2, &[]).unwrap();
            writer.flush().unwrap();
        }
        {
            let mut writer = ResultWriter::open_append(&path, "seed,total").unwrap();
            writer.write_result(3, 4, &[]).unwrap();
            writer.flush().unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "seed,total\n1,2\n3,4\n");
    }
}
