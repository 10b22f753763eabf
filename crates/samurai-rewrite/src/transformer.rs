//! Modification application
//!
//! Modifications carry offsets into the *original* text. Splicing them from
//! the highest start offset down keeps every not-yet-applied offset valid,
//! because each splice only shifts text after it.

use samurai_foundation::{Modification, SamuraiError, SamuraiResult};
use std::path::Path;
use tracing::trace;

/// Apply `modifications` to `source` and return the new text.
///
/// Text outside all modification ranges is preserved byte for byte. Ranges
/// must be in bounds, on char boundaries and pairwise disjoint.
pub fn apply_modifications(
    file: &Path,
    source: &str,
    modifications: &[Modification],
) -> SamuraiResult<String> {
    let mut ordered: Vec<&Modification> = modifications.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    for m in &ordered {
        if m.start > m.end
            || m.end > source.len()
            || !source.is_char_boundary(m.start)
            || !source.is_char_boundary(m.end)
        {
            return Err(SamuraiError::EditOutOfBounds {
                file: file.to_path_buf(),
                start: m.start,
                end: m.end,
                len: source.len(),
            });
        }
    }

    // Descending order: each modification must end before the previous one starts
    for pair in ordered.windows(2) {
        let (later, earlier) = (pair[0], pair[1]);
        if earlier.overlaps(later) {
            return Err(SamuraiError::OverlappingEdit {
                file: file.to_path_buf(),
                first_start: earlier.start,
                first_end: earlier.end,
                second_start: later.start,
                second_end: later.end,
            });
        }
    }

    let mut result = source.to_string();
    for m in ordered {
        trace!(start = m.start, end = m.end, content = %m.content, "Applying modification");
        result.replace_range(m.start..m.end, &m.content);
    }

    Ok(result)
}
