use wflang_parser::Position;

pub const SAMPLE: &str = r#"// Overtime eligibility
var threshold = 40;
var worked = sumTime(over week alias w, hours, where pay_code in set WORKED_CODES);
/* Premium applies to
   anything over threshold */
var premium = max(worked - threshold, 0);
if(premium > 0 && contains(getPayCurrencyCode(), "USD"), premium * 1.5, 0)
"#;

/// Position of the `nth` occurrence (zero-based) of `needle` in `source`,
/// shifted right by `offset` bytes.
pub fn position_of(source: &str, needle: &str, nth: usize, offset: usize) -> Position {
    let (start, _) = source
        .match_indices(needle)
        .nth(nth)
        .unwrap_or_else(|| panic!("occurrence {} of {:?} not found", nth, needle));
    let byte = start + offset;
    let line_start = source[..byte].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let line = source[..byte].matches('\n').count();
    Position::new(line as u32, (byte - line_start) as u32)
}
