//! Content-addressed change detection
//!
//! Every reconciled row carries a `delta_hash`: a SHA-256 digest of its
//! tracked business attributes, encoded canonically so that semantically
//! equal rows always hash equal regardless of representation. A write is
//! performed only when the freshly computed digest differs from the stored
//! one, which is what makes repeated reconciliation runs no-ops.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Byte separating fields in the canonical encoding. Prevents two adjacent
/// fields from colliding with a single longer field.
const FIELD_SEP: u8 = 0x1f;

/// Marker byte for an absent value. Distinguishes `None` from `Some("")`.
const NIL: u8 = 0x00;

/// Marker byte preceding a present value.
const VAL: u8 = 0x01;

/// Canonical attribute-tuple encoder feeding a SHA-256 hasher.
///
/// Fields must be pushed in a stable order. Strings are trimmed; numbers
/// and dates are rendered in a fixed decimal / ISO form.
pub struct Canonical {
    hasher: Sha256,
}

impl Canonical {
    pub fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    /// Push an optional text attribute, trimming surrounding whitespace.
    pub fn text(&mut self, value: Option<&str>) {
        match value {
            Some(v) => {
                self.hasher.update([VAL]);
                self.hasher.update(v.trim().as_bytes());
            }
            None => self.hasher.update([NIL]),
        }
        self.hasher.update([FIELD_SEP]);
    }

    /// Push an optional integer attribute.
    pub fn int(&mut self, value: Option<i64>) {
        match value {
            Some(v) => {
                self.hasher.update([VAL]);
                self.hasher.update(v.to_string().as_bytes());
            }
            None => self.hasher.update([NIL]),
        }
        self.hasher.update([FIELD_SEP]);
    }

    /// Push an optional date attribute.
    pub fn date(&mut self, value: Option<NaiveDate>) {
        match value {
            Some(v) => {
                self.hasher.update([VAL]);
                self.hasher.update(v.format("%Y-%m-%d").to_string().as_bytes());
            }
            None => self.hasher.update([NIL]),
        }
        self.hasher.update([FIELD_SEP]);
    }

    /// Finish the encoding and return the lowercase hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Default for Canonical {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows that participate in digest-gated reconciliation.
///
/// Implementations push every tracked business attribute, in a stable order,
/// and never the `delta_hash` or `batch_id` bookkeeping columns.
pub trait Fingerprint {
    /// Push the tracked attributes into the canonical encoder.
    fn fingerprint(&self, enc: &mut Canonical);

    /// Compute the delta hash of the current attribute values.
    fn delta_hash(&self) -> String {
        let mut enc = Canonical::new();
        self.fingerprint(&mut enc);
        enc.finish()
    }
}
