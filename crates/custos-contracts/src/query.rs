//! Read-path types: filters, cursor pagination, and result pages.
//!
//! Used by both the chain store (which executes them) and the query
//! service (which clamps limits and delegates).  Cursors are entry
//! sequences, exclusive: ascending reads return entries *after* the
//! cursor, descending reads return entries *before* it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{ActorId, AuditLogEntry};

/// The direction a listing walks the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Oldest first, by ascending sequence.  The order verification uses.
    #[default]
    Ascending,
    /// Newest first, by descending sequence.  The order audit UIs default to.
    Descending,
}

/// Field and time-range filters for listing entries.
///
/// All populated fields must match for an entry to be included.  The time
/// range is inclusive on both ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Only entries caused by this principal.
    pub actor: Option<ActorId>,

    /// Only entries with this exact action string.
    pub action: Option<String>,

    /// Only entries touching this entity type.
    pub entity_type: Option<String>,

    /// Only entries touching this entity id.
    pub entity_id: Option<String>,

    /// Only entries created at or after this instant.
    pub since: Option<DateTime<Utc>>,

    /// Only entries created at or before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl EntryFilter {
    /// True when `entry` satisfies every populated filter field.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(actor) = &self.actor {
            if entry.actor != *actor {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if entry.action != *action {
                return false;
            }
        }
        if let Some(entity_type) = &self.entity_type {
            if entry.entity_type != *entity_type {
                return false;
            }
        }
        if let Some(entity_id) = &self.entity_id {
            if entry.entity_id != *entity_id {
                return false;
            }
        }
        if let Some(since) = &self.since {
            if entry.created_at < *since {
                return false;
            }
        }
        if let Some(until) = &self.until {
            if entry.created_at > *until {
                return false;
            }
        }
        true
    }
}

/// One page worth of listing parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRequest {
    /// Walk direction.
    pub order: SortOrder,

    /// Exclusive sequence cursor from a previous page's `next_cursor`, or
    /// `None` to start from the beginning of the walk.
    pub cursor: Option<u64>,

    /// Maximum number of entries to return.  At the store layer, 0 means
    /// unbounded; the query service clamps to its configured maximum
    /// before delegating.
    pub limit: usize,
}

impl PageRequest {
    /// An ascending page request with the given cursor and limit.
    pub fn ascending(cursor: Option<u64>, limit: usize) -> Self {
        Self {
            order: SortOrder::Ascending,
            cursor,
            limit,
        }
    }

    /// A descending page request with the given cursor and limit.
    pub fn descending(cursor: Option<u64>, limit: usize) -> Self {
        Self {
            order: SortOrder::Descending,
            cursor,
            limit,
        }
    }
}

/// One page of entries plus the cursor for the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPage {
    /// Entries in the requested order.
    pub entries: Vec<AuditLogEntry>,

    /// Cursor to pass back for the next page, or `None` when the walk is
    /// exhausted.
    pub next_cursor: Option<u64>,
}

impl EntryPage {
    /// A page with no entries and no continuation.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            next_cursor: None,
        }
    }
}
