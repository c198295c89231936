//! Route pattern compilation.
//!
//! A pattern is a `/`-separated list of segments:
//!
//! - `name` matches the literal segment `name`
//! - `:name` captures one segment into the handler argument called `name`
//! - `::name` captures every remaining segment, joined with `/`, into the string
//!   argument `name`. It must be the last segment.
//!
//! An empty pattern, or `/`, targets the default page.
//!
//! # Example
//! ```
//! use uniweb_route::{parse, ArgType, Param, ParamKind, ReturnKind, Signature};
//!
//! let signature = Signature::new(ReturnKind::Text).arg("number", ArgType::Int);
//! let params = parse("samplepage/number/:number/", &signature).unwrap();
//!
//! assert_eq!(
//!     params,
//!     vec![Param::literal("samplepage"), Param::literal("number"), Param::capture(ParamKind::Int, "number", 0)]
//! );
//! ```

use crate::{Param, ParamKind, ParseError, Signature};

const CAPTURE_MARKER: char = ':';

/// Compiles `pattern` against the handler described by `signature`.
///
/// Request and response context slots are never bound by a capture.
pub fn parse(pattern: &str, signature: &Signature) -> Result<Vec<Param>, ParseError> {
    let segments = pattern.split('/').filter(|segment| !segment.trim().is_empty()).collect::<Vec<_>>();

    if segments.is_empty() {
        return Ok(vec![Param::default_page()]);
    }

    let last = segments.len() - 1;
    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| parse_segment(segment, index == last, signature))
        .collect()
}

fn parse_segment(segment: &str, is_last: bool, signature: &Signature) -> Result<Param, ParseError> {
    let Some(marked) = segment.strip_prefix(CAPTURE_MARKER) else {
        return Ok(Param::literal(segment));
    };

    let absorbs_rest = marked.starts_with(CAPTURE_MARKER);
    let name = marked.trim_start_matches(CAPTURE_MARKER);

    let (slot, spec) = signature.find_arg(name).ok_or_else(|| ParseError::unknown_capture_name(name))?;
    let kind = spec.ty().capture_kind().ok_or_else(|| ParseError::unsupported_capture_type(name, spec.ty()))?;

    if !absorbs_rest {
        return Ok(Param::capture(kind, name, slot));
    }

    if !is_last {
        return Err(ParseError::absorb_rest_not_last(name));
    }

    if kind != ParamKind::String {
        return Err(ParseError::absorb_rest_must_be_string(name));
    }

    Ok(Param::rest(name, slot))
}
