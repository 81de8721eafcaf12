//! Slash-delimited paths into the database tree

use crate::error::{FirelinkError, FirelinkResult};
use std::fmt;

/// Longest key the database accepts, in UTF-8 bytes
pub const MAX_KEY_BYTES: usize = 768;

/// Deepest path the database accepts
pub const MAX_DEPTH: usize = 32;

const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

/// A normalized database path.
///
/// Segments are joined with `/` with no leading or trailing slash; the empty
/// path is the root. Construction validates every segment, so a
/// `DatabasePath` always names a location the database can store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DatabasePath(String);

impl DatabasePath {
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a path such as `users/u1` or `/users/u1/`. Empty means root.
    pub fn parse(raw: &str) -> FirelinkResult<Self> {
        Self::root().join_segments(raw, true)
    }

    /// Append `name`, which may itself contain `/`.
    ///
    /// Empty segments are dropped, so `join("a").join("b")` and `join("a/b")`
    /// produce the same path. A name without any segment is rejected.
    pub fn join(&self, name: &str) -> FirelinkResult<Self> {
        self.join_segments(name, false)
    }

    /// Everything before the last segment; the root has no parent
    pub fn parent(&self) -> FirelinkResult<Self> {
        if self.is_root() {
            return Err(FirelinkError::invalid_path(
                "",
                "the root of the database has no parent",
            ));
        }
        match self.0.rfind('/') {
            Some(idx) => Ok(Self(self.0[..idx].to_string())),
            None => Ok(Self::root()),
        }
    }

    /// Last segment, `None` at the root
    pub fn key(&self) -> Option<&str> {
        self.segments().last()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    fn join_segments(&self, raw: &str, allow_empty: bool) -> FirelinkResult<Self> {
        let mut joined = self.0.clone();
        let mut depth = self.depth();
        let mut added = 0;

        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            validate_key(raw, segment)?;
            depth += 1;
            if depth > MAX_DEPTH {
                return Err(FirelinkError::invalid_path(
                    raw,
                    format!("paths may be at most {} levels deep", MAX_DEPTH),
                ));
            }
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
            added += 1;
        }

        if added == 0 && !allow_empty {
            return Err(FirelinkError::invalid_path(
                raw,
                "child name must contain at least one non-empty segment",
            ));
        }
        Ok(Self(joined))
    }
}

impl fmt::Display for DatabasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

fn validate_key(raw: &str, segment: &str) -> FirelinkResult<()> {
    if let Some(c) = segment
        .chars()
        .find(|c| FORBIDDEN_KEY_CHARS.contains(c) || c.is_ascii_control())
    {
        return Err(FirelinkError::invalid_path(
            raw,
            format!("key '{}' contains forbidden character {:?}", segment, c),
        ));
    }
    if segment.len() > MAX_KEY_BYTES {
        return Err(FirelinkError::invalid_path(
            raw,
            format!("key is longer than {} bytes", MAX_KEY_BYTES),
        ));
    }
    Ok(())
}
