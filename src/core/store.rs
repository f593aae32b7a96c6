//! The ordered template collection and its persisted mirror.
//!
//! [`TemplateStore`] is the only owner of the collection. Every mutation is made on a
//! working copy, the copy is saved through the [`SnapshotStore`], and only then does
//! it replace the in-memory collection. A failed save therefore leaves memory and
//! disk agreeing on the previous state.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::error::{Error, Result};
use crate::core::repository::SnapshotStore;
use crate::core::template::{Template, TemplateFields, generate_id};

/// Outcome of [`TemplateStore::import_batch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records appended to the collection, including ones re-identified on collision
    pub added: usize,
    /// Of those, how many received a fresh id because theirs was taken
    pub reassigned: usize,
    /// Candidates dropped for missing `id`, `name` or `content`
    pub skipped: usize,
}

/// Ordered, persisted collection of prompt templates.
pub struct TemplateStore<S: SnapshotStore> {
    templates: Vec<Template>,
    snapshots: S,
}

impl<S: SnapshotStore> TemplateStore<S> {
    /// Open the store, loading the saved snapshot.
    ///
    /// When nothing has been saved yet the collection starts empty, or with `seed`
    /// if one is given; a seeded collection is saved immediately.
    ///
    /// A snapshot in which two templates share an id is rejected with a consistency
    /// error and left as it is on disk.
    pub fn open(snapshots: S, seed: Option<Vec<Template>>) -> Result<Self> {
        match snapshots.load()? {
            Some(templates) => {
                ensure_unique_ids(&templates)?;
                debug!(
                    count = templates.len(),
                    location = %snapshots.location(),
                    "Loaded template snapshot"
                );
                Ok(Self {
                    templates,
                    snapshots,
                })
            }
            None => {
                let mut store = Self {
                    templates: Vec::new(),
                    snapshots,
                };
                if let Some(seed) = seed {
                    info!(count = seed.len(), "Seeding template store with defaults");
                    store.commit(seed)?;
                }
                Ok(store)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Create a template at the head of the collection and return its id.
    pub fn create(&mut self, name: &str, desc: &str, content: &str) -> Result<String> {
        let template = Template::new(self.fresh_id(), name, desc, content)?;
        let id = template.id.clone();

        let mut next = Vec::with_capacity(self.templates.len() + 1);
        next.push(template);
        next.extend(self.templates.iter().cloned());
        self.commit(next)?;

        info!(id = %id, "Created template");
        Ok(id)
    }

    /// Replace a template's name, description and content in place.
    pub fn update(&mut self, id: &str, name: &str, desc: &str, content: &str) -> Result<()> {
        let index = self.position(id)?;
        let fields = TemplateFields::validate(name, desc, content)?;

        let mut next = self.templates.clone();
        next[index].apply(fields);
        self.commit(next)?;

        info!(id = %id, "Updated template");
        Ok(())
    }

    /// Remove a template, keeping the others in order.
    pub fn delete(&mut self, id: &str) -> Result<Template> {
        let index = self.position(id)?;

        let mut next = self.templates.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(id = %id, "Deleted template");
        Ok(removed)
    }

    /// Put the collection in exactly the order given by `ids`.
    ///
    /// `ids` must name every template once. A sequence of the wrong length usually
    /// means it came from a filtered view; it is rejected and nothing changes.
    pub fn reorder<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<()> {
        if ids.len() != self.templates.len() {
            return Err(Error::consistency(format!(
                "reorder expected {} ids, got {}",
                self.templates.len(),
                ids.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let mut next = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(Error::consistency(format!("id {id} appears twice in reorder")));
            }
            let template = self
                .get(id)
                .ok_or_else(|| Error::consistency(format!("id {id} is not in the collection")))?;
            next.push(template.clone());
        }

        self.commit(next)?;
        debug!(count = ids.len(), "Reordered templates");
        Ok(())
    }

    /// Move one template to `to` (clamped to the last position), shifting the rest.
    ///
    /// This is the single drop-time reorder a drag gesture turns into.
    pub fn move_to(&mut self, id: &str, to: usize) -> Result<()> {
        let from = self.position(id)?;
        let mut ids: Vec<&str> = self.templates.iter().map(|t| t.id.as_str()).collect();
        let moved = ids.remove(from);
        ids.insert(to.min(ids.len()), moved);

        let ids: Vec<String> = ids.into_iter().map(str::to_string).collect();
        self.reorder(&ids)
    }

    /// Templates whose name or description contains `query`, ignoring case.
    ///
    /// A blank query returns everything; any other query is matched as given,
    /// surrounding whitespace included. The result borrows from the store and only
    /// reflects its order; it is never a valid input for [`Self::reorder`] unless the
    /// query was blank.
    pub fn search(&self, query: &str) -> Vec<&Template> {
        if query.trim().is_empty() {
            return self.templates.iter().collect();
        }
        let needle = query.to_lowercase();
        self.templates.iter().filter(|t| t.matches(&needle)).collect()
    }

    /// Append imported records.
    ///
    /// Candidates without a non-empty `id`, `name` and `content` are skipped. A
    /// record whose id is already taken is added anyway under a new id, so an import
    /// never overwrites or drops anything. The collection is saved once at the end.
    pub fn import_batch<I>(&mut self, candidates: I) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut next = self.templates.clone();
        let mut taken: HashSet<String> = next.iter().map(|t| t.id.clone()).collect();
        let mut summary = ImportSummary {
            added: 0,
            reassigned: 0,
            skipped: 0,
        };

        for candidate in candidates {
            let Some(mut template) = Template::from_candidate(candidate) else {
                summary.skipped += 1;
                continue;
            };

            if taken.contains(&template.id) {
                let id = unique_id(&taken);
                debug!(original = %template.id, id = %id, "Import id collision, assigning new id");
                template.id = id;
                summary.reassigned += 1;
            }

            taken.insert(template.id.clone());
            next.push(template);
            summary.added += 1;
        }

        if summary.skipped > 0 {
            warn!(skipped = summary.skipped, "Skipped incomplete import records");
        }
        if summary.added > 0 {
            self.commit(next)?;
        }

        info!(
            added = summary.added,
            reassigned = summary.reassigned,
            "Imported templates"
        );
        Ok(summary)
    }

    /// Full ordered snapshot of the collection.
    pub fn export_all(&self) -> Vec<Template> {
        self.templates.clone()
    }

    /// Replace the whole collection with `defaults`. Destructive.
    pub fn reset_to_defaults(&mut self, defaults: Vec<Template>) -> Result<()> {
        let count = defaults.len();
        self.commit(defaults)?;
        info!(count, "Reset templates to defaults");
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::template_not_found(id))
    }

    fn fresh_id(&self) -> String {
        let taken: HashSet<String> = self.templates.iter().map(|t| t.id.clone()).collect();
        unique_id(&taken)
    }

    fn commit(&mut self, next: Vec<Template>) -> Result<()> {
        self.snapshots.save(&next).inspect_err(|e| {
            warn!(location = %self.snapshots.location(), error = %e, "Failed to save templates");
        })?;
        self.templates = next;
        Ok(())
    }
}

fn ensure_unique_ids(templates: &[Template]) -> Result<()> {
    let mut seen = HashSet::with_capacity(templates.len());
    match templates.iter().find(|t| !seen.insert(t.id.as_str())) {
        Some(duplicate) => Err(Error::consistency(format!(
            "saved snapshot contains id {} more than once",
            duplicate.id
        ))),
        None => Ok(()),
    }
}

fn unique_id(taken: &HashSet<String>) -> String {
    loop {
        let id = generate_id();
        if !taken.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::infrastructure::storage::MemoryStore;
    use serde_json::json;
    use tracing_test::traced_test;

    fn empty_store() -> (TemplateStore<MemoryStore>, MemoryStore) {
        let snapshots = MemoryStore::new();
        let store = TemplateStore::open(snapshots.clone(), None).unwrap();
        (store, snapshots)
    }

    fn store_with(names: &[&str]) -> (TemplateStore<MemoryStore>, MemoryStore, Vec<String>) {
        let (mut store, snapshots) = empty_store();
        // Created in reverse so the collection reads in the order given.
        let mut ids: Vec<String> = names
            .iter()
            .rev()
            .map(|name| store.create(name, "", &format!("[{name}]")).unwrap())
            .collect();
        ids.reverse();
        (store, snapshots, ids)
    }

    fn names(store: &TemplateStore<MemoryStore>) -> Vec<String> {
        store.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_open_without_snapshot_is_empty_and_unsaved() {
        let (store, snapshots) = empty_store();
        assert!(store.is_empty());
        assert_eq!(snapshots.save_count(), 0);
    }

    #[test]
    fn test_open_seeds_and_persists_defaults() {
        let snapshots = MemoryStore::new();
        let seed = vec![Template::new("d1".into(), "Default", "", "[x]").unwrap()];
        let store = TemplateStore::open(snapshots.clone(), Some(seed.clone())).unwrap();

        assert_eq!(store.export_all(), seed);
        assert_eq!(snapshots.load().unwrap(), Some(seed));
    }

    #[test]
    fn test_open_prefers_existing_snapshot_over_seed() {
        let snapshots = MemoryStore::with_snapshot("[]");
        let seed = vec![Template::new("d1".into(), "Default", "", "[x]").unwrap()];
        let store = TemplateStore::open(snapshots, Some(seed)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_rejects_snapshot_with_duplicate_ids() {
        let raw = r#"[{"id":"1","name":"A","content":"x"},{"id":"1","name":"B","content":"y"}]"#;
        let snapshots = MemoryStore::with_snapshot(raw);

        let err = TemplateStore::open(snapshots.clone(), None).err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(err.to_string().contains("id 1 more than once"));
        assert_eq!(snapshots.raw_snapshot().as_deref(), Some(raw));
        assert_eq!(snapshots.save_count(), 0);
    }

    #[test]
    fn test_create_inserts_at_head_and_persists() {
        let (mut store, snapshots) = empty_store();
        let first = store.create("First", "", "one").unwrap();
        let second = store.create("Second", "desc", "two").unwrap();

        assert_ne!(first, second);
        assert_eq!(names(&store), vec!["Second", "First"]);
        assert_eq!(snapshots.load().unwrap(), Some(store.export_all()));
        assert_eq!(snapshots.save_count(), 2);
    }

    #[test]
    fn test_create_rejects_blank_fields_without_mutation() {
        let (mut store, snapshots) = empty_store();
        assert_eq!(store.create("  ", "", "body").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(store.create("name", "", "\n ").unwrap_err().kind(), ErrorKind::Validation);
        assert!(store.is_empty());
        assert_eq!(snapshots.save_count(), 0);
    }

    #[test]
    fn test_update_keeps_position_and_extra_fields() {
        let (mut store, _snapshots) = empty_store();
        store
            .import_batch(vec![
                json!({"id": "a", "name": "A", "content": "x", "tags": ["keep"]}),
                json!({"id": "b", "name": "B", "content": "y"}),
            ])
            .unwrap();

        store.update("a", " A2 ", " new desc ", "[z]").unwrap();

        let updated = store.get("a").unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.desc, "new desc");
        assert_eq!(updated.content, "[z]");
        assert_eq!(updated.extra["tags"], json!(["keep"]));
        assert_eq!(names(&store), vec!["A2", "B"]);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let (mut store, _snapshots, _ids) = store_with(&["A"]);
        let err = store.update("nope", "B", "", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_validates_fields() {
        let (mut store, _snapshots, ids) = store_with(&["A"]);
        let err = store.update(&ids[0], "", "", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(names(&store), vec!["A"]);
    }

    #[test]
    fn test_delete_preserves_remaining_order() {
        let (mut store, snapshots, ids) = store_with(&["A", "B", "C"]);
        let removed = store.delete(&ids[1]).unwrap();

        assert_eq!(removed.name, "B");
        assert_eq!(names(&store), vec!["A", "C"]);
        assert_eq!(snapshots.load().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing_id_is_not_found() {
        let (mut store, _snapshots, _ids) = store_with(&["A"]);
        assert_eq!(store.delete("nope").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reorder_applies_full_sequence() {
        let (mut store, snapshots, ids) = store_with(&["A", "B", "C"]);
        store.reorder(&[&ids[2], &ids[0], &ids[1]]).unwrap();

        assert_eq!(names(&store), vec!["C", "A", "B"]);
        let saved: Vec<String> = snapshots
            .load()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(saved, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reorder_wrong_length_leaves_everything_unchanged() {
        let (mut store, snapshots, ids) = store_with(&["A", "B", "C"]);
        let before = snapshots.raw_snapshot();

        let err = store.reorder(&[&ids[2], &ids[0]]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert_eq!(names(&store), vec!["A", "B", "C"]);
        assert_eq!(snapshots.raw_snapshot(), before);
    }

    #[test]
    fn test_reorder_rejects_duplicate_or_unknown_ids() {
        let (mut store, _snapshots, ids) = store_with(&["A", "B"]);
        let dup = store.reorder(&[&ids[0], &ids[0]]).unwrap_err();
        let unknown = store.reorder(&[ids[0].as_str(), "ghost"]).unwrap_err();

        assert_eq!(dup.kind(), ErrorKind::Consistency);
        assert_eq!(unknown.kind(), ErrorKind::Consistency);
        assert_eq!(names(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_move_to_shifts_and_clamps() {
        let (mut store, _snapshots, ids) = store_with(&["A", "B", "C", "D"]);
        store.move_to(&ids[0], 2).unwrap();
        assert_eq!(names(&store), vec!["B", "C", "A", "D"]);

        store.move_to(&ids[1], 99).unwrap();
        assert_eq!(names(&store), vec!["C", "A", "D", "B"]);

        assert_eq!(store.move_to("ghost", 0).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_search_matches_name_or_desc_in_stored_order() {
        let (mut store, _snapshots) = empty_store();
        store.create("Email", "formal TONE", "x").unwrap();
        store.create("Translate", "", "y").unwrap();
        store.create("Tone check", "", "z").unwrap();

        let hits: Vec<&str> = store.search("tone").iter().map(|t| t.name.as_str()).collect();
        assert_eq!(hits, vec!["Tone check", "Email"]);
        assert!(store.search("absent").is_empty());
    }

    #[test]
    fn test_search_blank_query_returns_everything() {
        let (store, _snapshots, _ids) = store_with(&["A", "B"]);
        assert_eq!(store.search("").len(), 2);
        assert_eq!(store.search("   ").len(), 2);
    }

    #[test]
    fn test_search_does_not_trim_non_blank_query() {
        let (mut store, _snapshots) = empty_store();
        store.create("codex", "", "x").unwrap();
        store.create("Code review", "", "y").unwrap();

        let hits: Vec<&str> = store.search("code ").iter().map(|t| t.name.as_str()).collect();
        assert_eq!(hits, vec!["Code review"]);
        assert_eq!(store.search(" codex").len(), 0);
    }

    #[test]
    fn test_import_appends_verbatim_and_skips_incomplete() {
        let (mut store, snapshots, _ids) = store_with(&["Existing"]);
        let saves_before = snapshots.save_count();

        let summary = store
            .import_batch(vec![
                json!({"id": "x1", "name": "One", "desc": "d", "content": "[a]", "color": "red"}),
                json!({"id": "x2", "name": "", "content": "[b]"}),
                json!({"name": "No id", "content": "[c]"}),
                json!("not an object"),
                json!({"id": "x3", "name": "Three", "content": "[d]"}),
            ])
            .unwrap();

        assert_eq!(summary, ImportSummary { added: 2, reassigned: 0, skipped: 3 });
        assert_eq!(names(&store), vec!["Existing", "One", "Three"]);
        assert_eq!(store.get("x1").unwrap().extra["color"], json!("red"));
        assert_eq!(snapshots.save_count(), saves_before + 1);
    }

    #[test]
    fn test_import_collision_adds_copy_under_new_id() {
        let (mut store, _snapshots) = empty_store();
        store
            .import_batch(vec![json!({"id": "1", "name": "A", "content": "x"})])
            .unwrap();

        let summary = store
            .import_batch(vec![json!({"id": "1", "name": "B", "content": "x"})])
            .unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.reassigned, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").unwrap().name, "A");
        let copy = store.iter().find(|t| t.name == "B").unwrap();
        assert_ne!(copy.id, "1");
    }

    #[test]
    fn test_import_collision_within_same_batch() {
        let (mut store, _snapshots) = empty_store();
        let summary = store
            .import_batch(vec![
                json!({"id": "same", "name": "First", "content": "x"}),
                json!({"id": "same", "name": "Second", "content": "y"}),
            ])
            .unwrap();

        assert_eq!(summary.added, 2);
        assert_eq!(summary.reassigned, 1);
        let ids: HashSet<&str> = store.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.get("same").unwrap().name, "First");
    }

    #[test]
    #[traced_test]
    fn test_import_logs_skipped_records() {
        let (mut store, _snapshots) = empty_store();
        store
            .import_batch(vec![json!({"id": "1", "name": "A"})])
            .unwrap();
        assert!(logs_contain("Skipped incomplete import records"));
    }

    #[test]
    fn test_import_nothing_valid_does_not_save() {
        let (mut store, snapshots) = empty_store();
        let summary = store.import_batch(vec![json!({}), json!(null)]).unwrap();
        assert_eq!(summary.added, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(snapshots.save_count(), 0);
    }

    #[test]
    fn test_export_import_round_trip_preserves_ids() {
        let (source, _snapshots, _ids) = store_with(&["A", "B", "C"]);
        let exported = serde_json::to_value(source.export_all()).unwrap();

        let (mut target, _target_snapshots) = empty_store();
        let candidates = exported.as_array().unwrap().clone();
        let summary = target.import_batch(candidates).unwrap();

        assert_eq!(summary.added, 3);
        assert_eq!(summary.reassigned, 0);
        assert_eq!(target.export_all(), source.export_all());
    }

    #[test]
    fn test_reset_to_defaults_replaces_collection() {
        let (mut store, snapshots, _ids) = store_with(&["Mine"]);
        let defaults = vec![
            Template::new("d1".into(), "D1", "", "[a]").unwrap(),
            Template::new("d2".into(), "D2", "", "[b]").unwrap(),
        ];

        store.reset_to_defaults(defaults.clone()).unwrap();

        assert_eq!(store.export_all(), defaults);
        assert_eq!(snapshots.load().unwrap(), Some(defaults));
    }

    #[test]
    fn test_failed_save_rolls_back_every_mutation() {
        let (mut store, snapshots, ids) = store_with(&["A", "B"]);
        let before = store.export_all();
        snapshots.fail_writes(true);

        assert_eq!(store.create("C", "", "x").unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(store.update(&ids[0], "Z", "", "x").unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(store.delete(&ids[0]).unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(store.reorder(&[&ids[1], &ids[0]]).unwrap_err().kind(), ErrorKind::Io);
        assert!(
            store
                .import_batch(vec![json!({"id": "n", "name": "N", "content": "x"})])
                .is_err()
        );

        assert_eq!(store.export_all(), before);
        assert_eq!(snapshots.load().unwrap(), Some(before));
    }
}
