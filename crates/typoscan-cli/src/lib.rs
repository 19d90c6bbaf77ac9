// typoscan-cli: shared pieces of the `typoscan` binary.

use std::io::BufRead;

use typoscan_check::pipeline::normalize_line;
use typoscan_check::{CheckError, Detector, Misspellings, Speller};

pub mod colors;
pub mod config;
pub mod input;
pub mod pager;
pub mod render;

use input::{InputEncoding, InputError, InputLines};

/// Failure while scanning one input.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The input could not be read; the rest of the run can go on.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The detector misbehaved; the run must stop.
    #[error(transparent)]
    Check(#[from] CheckError),
}

/// Feed every line of `reader` through `detector` into `store`.
///
/// Returns the number of findings. Findings of lines read before an
/// error stay in the store.
pub fn scan_input<R: BufRead, S: Speller>(
    detector: &Detector<'_, S>,
    name: &str,
    reader: R,
    encoding: InputEncoding,
    store: &mut Misspellings,
) -> Result<usize, ScanError> {
    let mut total = 0;
    for line in InputLines::new(reader, name, encoding) {
        let line = normalize_line(&line?);
        total += detector.scan(&line, store)?;
    }
    tracing::debug!(input = name, findings = total, "scanned input");
    Ok(total)
}
