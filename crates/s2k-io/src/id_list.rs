//! Expansion of compact element id lists.
//!
//! Pre-processors such as HyperMesh print selections as space separated ids
//! and inclusive ranges (`692-697 805`); Femap list import wants one id per
//! line.

use crate::error::{IoError, Result};

/// Largest number of ids a single `start-end` range may expand to.
pub const MAX_RANGE_SPAN: u64 = 1_000_000;

/// Expand ids and inclusive `start-end` ranges in source order.
///
/// A range whose start exceeds its end contributes nothing. A range covering
/// more than [`MAX_RANGE_SPAN`] ids is rejected.
pub fn expand_id_ranges(text: &str) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    for token in text.split_whitespace() {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_id(token, start)?;
                let end = parse_id(token, end)?;
                if end.saturating_sub(start) >= MAX_RANGE_SPAN {
                    return Err(IoError::InvalidIdList {
                        token: token.to_string(),
                        reason: format!("range spans more than {MAX_RANGE_SPAN} ids"),
                    });
                }
                ids.extend(start..=end);
            }
            None => ids.push(parse_id(token, token)?),
        }
    }
    Ok(ids)
}

/// One id per line, each terminated by a newline.
pub fn format_id_list(ids: &[u64]) -> String {
    ids.iter().map(|id| format!("{id}\n")).collect()
}

fn parse_id(token: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|err| IoError::InvalidIdList {
        token: token.to_string(),
        reason: err.to_string(),
    })
}
