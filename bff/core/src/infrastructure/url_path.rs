// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! URL path segments built from caller-supplied ids and keys.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one path segment.
///
/// Returns `None` for empty, `.` and `..`: URL parsing collapses those
/// segments, so no encoding keeps them in place.
pub fn encode_segment(segment: &str) -> Option<String> {
    match segment {
        "" | "." | ".." => None,
        _ => Some(utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()),
    }
}

/// Encode every `/`-separated segment of `path`, keeping the separators.
pub fn encode_path(path: &str) -> Option<String> {
    path.split('/')
        .map(encode_segment)
        .collect::<Option<Vec<_>>>()
        .map(|segments| segments.join("/"))
}
