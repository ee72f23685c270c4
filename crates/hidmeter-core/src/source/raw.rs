use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::protocols::meter::layout::FRAME_LEN;

use super::{ReportEvent, ReportSource, SourceError};

/// Reads back-to-back 64-byte reports, as dumped straight from the device.
///
/// A trailing partial report is returned as a short report.
pub struct RawReportSource<R> {
    reader: R,
    done: bool,
}

pub type RawReportFileSource = RawReportSource<BufReader<File>>;

impl RawReportFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> RawReportSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> ReportSource for RawReportSource<R> {
    fn next_report(&mut self) -> Result<Option<ReportEvent>, SourceError> {
        if self.done {
            return Ok(None);
        }
        let mut buf = [0u8; FRAME_LEN];
        let filled = self.fill(&mut buf)?;
        if filled < FRAME_LEN {
            self.done = true;
            if filled == 0 {
                return Ok(None);
            }
            log::debug!("raw capture ends with a {filled}-byte partial report");
        }
        Ok(Some(ReportEvent {
            ts: None,
            data: buf[..filled].to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::RawReportSource;
    use crate::source::ReportSource;
    use std::io::Cursor;

    #[test]
    fn splits_stream_into_reports() {
        let mut bytes = vec![1u8; 64];
        bytes.extend_from_slice(&[2u8; 64]);
        let mut source = RawReportSource::new(Cursor::new(bytes));

        let first = source.next_report().unwrap().unwrap();
        assert_eq!(first.data, vec![1u8; 64]);
        assert_eq!(first.ts, None);
        let second = source.next_report().unwrap().unwrap();
        assert_eq!(second.data, vec![2u8; 64]);
        assert!(source.next_report().unwrap().is_none());
    }

    #[test]
    fn trailing_partial_report_is_passed_through() {
        let mut bytes = vec![0u8; 64];
        bytes.extend_from_slice(&[7u8; 10]);
        let mut source = RawReportSource::new(Cursor::new(bytes));

        assert_eq!(source.next_report().unwrap().unwrap().data.len(), 64);
        assert_eq!(source.next_report().unwrap().unwrap().data, vec![7u8; 10]);
        assert!(source.next_report().unwrap().is_none());
        assert!(source.next_report().unwrap().is_none());
    }

    #[test]
    fn empty_stream_has_no_reports() {
        let mut source = RawReportSource::new(Cursor::new(Vec::<u8>::new()));
        assert!(source.next_report().unwrap().is_none());
    }
}
