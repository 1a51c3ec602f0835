use std::io;

use tabwriter::TabWriter;

/// Spaces added after the widest cell of every column.
pub const COLUMN_PADDING: usize = 5;

/// Tab-separated sink that pads cells into aligned columns on `finish`.
///
/// Cells must already be compiled: ANSI color sequences are skipped when
/// measuring, anything else counts. The text after the last tab of a line
/// is never padded.
pub fn aligner() -> TabWriter<Vec<u8>> {
    TabWriter::new(Vec::new())
        .minwidth(0)
        .padding(COLUMN_PADDING)
        .ansi(true)
}

pub fn finish(aligner: TabWriter<Vec<u8>>) -> io::Result<String> {
    let buf = aligner
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
