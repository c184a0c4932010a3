//! Identifier generation for entities created during the document's
//! lifetime.

/// Produces `u<hex>` identifiers unique within one document.
///
/// The counter is seeded past the largest `u<hex>` identity observed while
/// loading, so generated ids can never collide with ids the producing
/// application wrote.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator { next: 0x1000 }
    }

    /// Note an identity seen in loaded content and move the counter past it.
    /// Prefixed ids (`Color/u1f4`) are reduced to their trailing segment.
    pub fn observe(&mut self, id: &str) {
        let tail = id.rsplit('/').next().unwrap_or(id);
        if let Some(hex) = tail.strip_prefix('u')
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            self.next = self.next.max(value + 1);
        }
    }

    /// The next unique identifier.
    pub fn next_id(&mut self) -> String {
        let id = format!("u{:x}", self.next);
        self.next += 1;
        id
    }

    /// The next unique identifier under an entity-kind prefix, e.g.
    /// `Color/u1001`.
    pub fn next_with_prefix(&mut self, kind: &str) -> String {
        format!("{}/{}", kind, self.next_id())
    }
}
