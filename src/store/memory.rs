use super::{CommentStore, StoreResult};
use crate::record::Comment;
use ahash::AHashMap;

/// Heap-backed store. Slots are never removed, so a slot index doubles as
/// insertion order (replacement keeps the slot, like an in-place update).
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Vec<Comment>,
    by_id: AHashMap<String, Vec<usize>>,     // sorted slot indices
    by_parent: AHashMap<String, Vec<usize>>, // sorted slot indices
}

fn index_add(map: &mut AHashMap<String, Vec<usize>>, key: &str, idx: usize) {
    let v = map.entry(key.to_string()).or_default();
    if let Err(pos) = v.binary_search(&idx) {
        v.insert(pos, idx);
    }
}

fn index_remove(map: &mut AHashMap<String, Vec<usize>>, key: &str, idx: usize) {
    if let Some(v) = map.get_mut(key) {
        if let Ok(pos) = v.binary_search(&idx) {
            v.remove(pos);
        }
        if v.is_empty() {
            map.remove(key);
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored comment in slot order.
    pub fn comments(&self) -> &[Comment] {
        &self.slots
    }
}

impl CommentStore for MemoryStore {
    fn find_by_key(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        Ok(self
            .by_id
            .get(comment_id)
            .and_then(|v| v.first())
            .map(|&i| self.slots[i].clone()))
    }

    fn find_best_above(&self, parent_id: &str, min_score: i64) -> StoreResult<Option<Comment>> {
        let Some(idxs) = self.by_parent.get(parent_id) else { return Ok(None) };
        let mut best: Option<&Comment> = None;
        for &i in idxs {
            let c = &self.slots[i];
            if c.score <= min_score { continue; }
            if best.map_or(true, |b| c.score > b.score) {
                best = Some(c);
            }
        }
        Ok(best.cloned())
    }

    fn replace(&mut self, comment_id: &str, comment: &Comment) -> StoreResult<bool> {
        let Some(idx) = self.by_id.get(comment_id).and_then(|v| v.first().copied()) else {
            return Ok(false);
        };
        let old = std::mem::replace(&mut self.slots[idx], comment.clone());
        index_remove(&mut self.by_id, &old.comment_id, idx);
        index_remove(&mut self.by_parent, &old.parent_id, idx);
        index_add(&mut self.by_id, &comment.comment_id, idx);
        index_add(&mut self.by_parent, &comment.parent_id, idx);
        Ok(true)
    }

    fn insert(&mut self, comment: &Comment) -> StoreResult<()> {
        let idx = self.slots.len();
        self.slots.push(comment.clone());
        index_add(&mut self.by_id, &comment.comment_id, idx);
        index_add(&mut self.by_parent, &comment.parent_id, idx);
        Ok(())
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        self.slots.clear();
        self.by_id.clear();
        self.by_parent.clear();
        Ok(())
    }

    fn count(&self) -> StoreResult<u64> {
        Ok(self.slots.len() as u64)
    }

    fn find_by_parent(&self, parent_id: &str) -> StoreResult<Vec<Comment>> {
        let mut out: Vec<Comment> = self
            .by_parent
            .get(parent_id)
            .map(|v| v.iter().map(|&i| self.slots[i].clone()).collect())
            .unwrap_or_default();
        // stable: ties keep slot order
        out.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(out)
    }
}
