//! Line-oriented rotation catalog parsing.

use crate::index::PlateRotation;

/// Minimum number of whitespace-separated fields in a rotation line.
const REQUIRED_FIELDS: usize = 6;

/// Parse rotation catalog text into rotations, in file order.
///
/// # Format
///
/// One rotation per line:
///
/// ```text
/// plateId time lat lon angle referencePlateId [comment...]
/// ```
///
/// - Blank lines and lines starting with `!` are comments
/// - Times are in millions of years, angles in degrees
/// - Everything after the sixth field is the comment; a leading `!` marker
///   is dropped and the words are re-joined with single spaces
///
/// Lines with fewer than six fields, or whose numeric fields do not parse to
/// finite values, are skipped. No partial record is ever produced.
#[must_use]
pub fn parse_catalog(text: &str) -> Vec<PlateRotation> {
    let mut rotations = Vec::new();
    let mut skipped = 0usize;

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        match parse_line(line) {
            Some(rotation) => rotations.push(rotation),
            None => {
                skipped += 1;
                tracing::trace!(line = number + 1, "skipping malformed rotation line");
            }
        }
    }

    tracing::debug!(
        rotations = rotations.len(),
        skipped,
        "parsed rotation catalog"
    );
    rotations
}

fn parse_line(line: &str) -> Option<PlateRotation> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < REQUIRED_FIELDS {
        return None;
    }

    let plate_id = fields[0].parse::<u32>().ok()?;
    let time = parse_finite(fields[1])?;
    let lat = parse_finite(fields[2])?;
    let lon = parse_finite(fields[3])?;
    let angle = parse_finite(fields[4])?;
    let reference_plate_id = fields[5].parse::<u32>().ok()?;

    let comment = fields[REQUIRED_FIELDS..].join(" ");
    let comment = comment
        .strip_prefix('!')
        .map_or(comment.as_str(), str::trim_start)
        .to_owned();

    Some(PlateRotation {
        plate_id,
        time,
        lat,
        lon,
        angle,
        reference_plate_id,
        comment,
    })
}

fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
