//! The local copy of a run's lines.
//!
//! The cache is plain state, no I/O: the edit queue applies optimistic
//! patches, the feed listener merges change events, and a full reload
//! replaces the whole set. Merging never produces outbound writes, so
//! feed traffic cannot loop back into the backend.

use picklijst_core::reconcile::line_display_order;
use picklijst_core::types::DbId;

use crate::messages::{ChangeAction, FeedEvent, FeedLine, LinePatch, LineRow};

/// Local cache of one run's picking lines, kept in display order.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: Vec<LineRow>,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire cache from a full load (reload/resync).
    pub fn reset(&mut self, lines: Vec<LineRow>) {
        self.lines = lines;
        self.sort();
    }

    /// Current lines, in display order.
    pub fn lines(&self) -> &[LineRow] {
        &self.lines
    }

    pub fn get(&self, id: DbId) -> Option<&LineRow> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines already picked, for the "done X of Y" header.
    pub fn done_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.status == picklijst_core::picking::LineStatus::Klaar)
            .count()
    }

    /// Apply an optimistic local patch immediately, before persistence.
    ///
    /// Unknown ids are ignored (the line may have been removed by a
    /// concurrent reload).
    pub fn apply_patch(&mut self, id: DbId, patch: &LinePatch) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            if let Some(picker) = &patch.picker {
                line.picker = picker.clone();
            }
            if let Some(status) = patch.status {
                line.status = status;
            }
        }
    }

    /// Merge one feed event into the cache.
    ///
    /// - Delete removes the line by id.
    /// - Insert appends an unseen line (without store info) and re-sorts;
    ///   an insert for a line already present merges like an update.
    /// - Update overwrites the row fields but keeps the local-only
    ///   [`StoreInfo`], which feed payloads never carry.
    pub fn merge_event(&mut self, event: &FeedEvent) {
        match event.action {
            ChangeAction::Delete => {
                self.lines.retain(|l| l.id != event.line_id);
            }
            ChangeAction::Insert | ChangeAction::Update => {
                let Some(incoming) = &event.line else {
                    return;
                };
                match self.lines.iter_mut().find(|l| l.id == incoming.id) {
                    Some(line) => merge_row(line, incoming),
                    None => {
                        self.lines.push(row_from_feed(incoming));
                        self.sort();
                    }
                }
            }
        }
    }

    /// Sort by store code, then metal — the same order the server uses.
    fn sort(&mut self) {
        self.lines.sort_by(|a, b| {
            line_display_order((a.store_code(), a.metal), (b.store_code(), b.metal))
        });
    }
}

/// Overwrite a cached row's fields from a feed payload, preserving the
/// joined store display data.
fn merge_row(line: &mut LineRow, incoming: &FeedLine) {
    line.run_id = incoming.run_id;
    line.store_id = incoming.store_id;
    line.metal = incoming.metal;
    line.picker = incoming.picker.clone();
    line.status = incoming.status;
    // line.store stays as-is: the feed payload has no join.
}

/// Build a cache row for a line first seen via the feed. The store join
/// is absent until the next full load.
fn row_from_feed(incoming: &FeedLine) -> LineRow {
    LineRow {
        id: incoming.id,
        run_id: incoming.run_id,
        store_id: incoming.store_id,
        metal: incoming.metal,
        picker: incoming.picker.clone(),
        status: incoming.status,
        store: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::StoreInfo;
    use picklijst_core::picking::{LineStatus, Metal};

    fn row(id: DbId, code: &str, metal: Metal) -> LineRow {
        LineRow {
            id,
            run_id: 1,
            store_id: id * 10,
            metal,
            picker: None,
            status: LineStatus::TeDoen,
            store: Some(StoreInfo {
                code: code.into(),
                name: format!("Store {code}"),
            }),
        }
    }

    fn feed_line(id: DbId, metal: Metal, picker: Option<&str>, status: LineStatus) -> FeedLine {
        FeedLine {
            id,
            run_id: 1,
            store_id: id * 10,
            metal,
            picker: picker.map(Into::into),
            status,
        }
    }

    fn update_event(line: FeedLine) -> FeedEvent {
        FeedEvent {
            action: ChangeAction::Update,
            run_id: line.run_id,
            line_id: line.id,
            line: Some(line),
        }
    }

    #[test]
    fn reset_sorts_by_store_code_then_metal() {
        let mut cache = LineCache::new();
        cache.reset(vec![
            row(1, "RTM", Metal::Staal),
            row(2, "AMS", Metal::Staal),
            row(3, "AMS", Metal::Zilver),
            row(4, "RTM", Metal::Zilver),
        ]);

        let order: Vec<DbId> = cache.lines().iter().map(|l| l.id).collect();
        assert_eq!(order, vec![3, 2, 4, 1]);
    }

    #[test]
    fn optimistic_patch_is_applied_immediately() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver)]);

        cache.apply_patch(1, &LinePatch::picker("Jan"));
        cache.apply_patch(1, &LinePatch::status(LineStatus::Bezig));

        let line = cache.get(1).unwrap();
        assert_eq!(line.picker.as_deref(), Some("Jan"));
        assert_eq!(line.status, LineStatus::Bezig);
    }

    #[test]
    fn patch_for_an_unknown_line_is_ignored() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver)]);
        cache.apply_patch(99, &LinePatch::picker("Jan"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn update_event_preserves_the_store_join() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver)]);

        cache.merge_event(&update_event(feed_line(
            1,
            Metal::Zilver,
            Some("Piet"),
            LineStatus::Klaar,
        )));

        let line = cache.get(1).unwrap();
        assert_eq!(line.picker.as_deref(), Some("Piet"));
        assert_eq!(line.status, LineStatus::Klaar);
        // The payload had no store data, yet the join survives.
        assert_eq!(line.store.as_ref().unwrap().code, "AMS");
    }

    #[test]
    fn insert_event_appends_without_store_and_resorts() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "RTM", Metal::Zilver)]);

        cache.merge_event(&FeedEvent {
            action: ChangeAction::Insert,
            run_id: 1,
            line_id: 2,
            line: Some(feed_line(2, Metal::Staal, None, LineStatus::TeDoen)),
        });

        assert_eq!(cache.len(), 2);
        // No join data, so the new line sorts first with an empty code.
        assert_eq!(cache.lines()[0].id, 2);
        assert!(cache.lines()[0].store.is_none());
    }

    #[test]
    fn insert_event_for_a_known_line_merges_instead_of_duplicating() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver)]);

        cache.merge_event(&FeedEvent {
            action: ChangeAction::Insert,
            run_id: 1,
            line_id: 1,
            line: Some(feed_line(1, Metal::Zilver, Some("Jan"), LineStatus::Bezig)),
        });

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().picker.as_deref(), Some("Jan"));
    }

    #[test]
    fn delete_event_removes_by_id() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver), row(2, "AMS", Metal::Staal)]);

        cache.merge_event(&FeedEvent {
            action: ChangeAction::Delete,
            run_id: 1,
            line_id: 1,
            line: None,
        });

        assert_eq!(cache.len(), 1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn done_count_tracks_klaar_lines() {
        let mut cache = LineCache::new();
        cache.reset(vec![row(1, "AMS", Metal::Zilver), row(2, "AMS", Metal::Staal)]);
        assert_eq!(cache.done_count(), 0);

        cache.apply_patch(1, &LinePatch::status(LineStatus::Klaar));
        assert_eq!(cache.done_count(), 1);
    }
}
