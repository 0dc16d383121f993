//! URL-safe article identifiers derived from titles.
//!
//! The first candidate is the plain slug; collisions retry with a random
//! numeric suffix a fixed number of times, and the final attempt carries a
//! 64-bit suffix and is taken without checking. The retry is bounded, so
//! pathological titles can slow creation down but never wedge it.
use sqlx::SqlitePool;

use crate::{error::AppError, store};

const MAX_ATTEMPTS: u32 = 5;

/// Lowercase, runs of non-alphanumerics collapsed to a single hyphen,
/// no leading or trailing hyphen. May be empty for symbol-only titles.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a slug no existing article uses.
pub async fn unique(pool: &SqlitePool, title: &str) -> Result<String, AppError> {
    let base = slugify(title);
    let base = if base.is_empty() { "untitled" } else { &base };

    for attempt in 0..MAX_ATTEMPTS {
        let candidate = if attempt == 0 {
            base.to_string()
        } else if attempt + 1 == MAX_ATTEMPTS {
            // Collision-resistant fallback, accepted unchecked.
            return Ok(format!("{base}-{}", rand::random::<u64>()));
        } else {
            format!("{base}-{}", rand::random::<u32>())
        };

        if !store::articles::slug_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    unreachable!("final slug attempt is returned without a lookup")
}
