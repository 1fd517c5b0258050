use log::{debug, info};

use crate::models::ParseOutcome;
use crate::parser::explodes::{explode, is_known_scheme, scheme_token};
use crate::parser::types::ParsedBatch;
use crate::utils::base64::base64_decode;

/// Parses newline-delimited share-links
///
/// Blank lines and lines starting with `#` are skipped. Every other line
/// goes through [`explode`]; lines that look like a URI but match no parser
/// contribute their scheme to `unsupported` unless the scheme belongs to a
/// supported protocol (that is just a broken link). Names are de-duplicated
/// before returning.
///
/// A whole batch wrapped in Base64 (the usual subscription encoding) is
/// decoded first.
pub fn parse_multiple_proxies(input: &str) -> ParseOutcome {
    let batch = match decode_wrapped_batch(input) {
        Some(decoded) => explode_lines(&decoded),
        None => explode_lines(input),
    };

    info!(
        "Parsed {} proxies from link batch ({} unsupported protocols)",
        batch.len(),
        batch.unsupported().len()
    );
    batch.finish()
}

/// Explodes each line of a link batch without de-duplicating names.
pub fn explode_lines(content: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(parsed) = explode(line) {
            batch.push(parsed);
            continue;
        }

        match scheme_token(line) {
            Some(scheme) if !is_known_scheme(&scheme) => {
                debug!("Unsupported protocol {} in line", scheme);
                batch.push_unsupported(scheme);
            }
            Some(scheme) => debug!("Skipping malformed {} link", scheme),
            None => debug!("Skipping line that is not a link"),
        }
    }

    batch
}

/// Decodes a Base64-wrapped batch, returning `None` when the input is
/// already plain links or does not decode to anything link-shaped.
pub fn decode_wrapped_batch(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return None;
    }
    let decoded = base64_decode(trimmed)?;
    if decoded.contains("://") {
        debug!("Decoded Base64-wrapped link batch");
        Some(decoded)
    } else {
        None
    }
}
