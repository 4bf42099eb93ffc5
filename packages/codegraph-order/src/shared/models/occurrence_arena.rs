//! Arena storage for occurrences
//!
//! Occurrences are allocated once per analysis run and referenced by
//! [`OccurrenceId`] everywhere else (traces, findings, reachability
//! queries). Nothing holds a reference back into the automaton, so there
//! are no ownership cycles between occurrences and compiled rules.

use super::occurrence::{Base, Occurrence, OccurrenceId};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Allocation statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArenaStats {
    pub occurrences: usize,
    pub distinct_targets: usize,
    pub distinct_bases: usize,
}

/// Append-only occurrence arena
#[derive(Debug, Default, Clone)]
pub struct OccurrenceArena {
    occurrences: Vec<Occurrence>,

    /// target → occurrences calling it
    by_target: FxHashMap<String, Vec<OccurrenceId>>,
}

impl OccurrenceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an occurrence and return its id
    pub fn alloc(&mut self, occurrence: Occurrence) -> OccurrenceId {
        let id = OccurrenceId(self.occurrences.len() as u32);
        self.by_target
            .entry(occurrence.target.clone())
            .or_default()
            .push(id);
        self.occurrences.push(occurrence);
        id
    }

    pub fn get(&self, id: OccurrenceId) -> Option<&Occurrence> {
        self.occurrences.get(id.index())
    }

    /// Source text of an occurrence, or its id when unknown
    pub fn code_of(&self, id: OccurrenceId) -> String {
        self.get(id)
            .map(|occ| occ.code.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// All occurrences calling `target`, in allocation order
    pub fn by_target(&self, target: &str) -> &[OccurrenceId] {
        self.by_target
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (OccurrenceId, &Occurrence)> {
        self.occurrences
            .iter()
            .enumerate()
            .map(|(idx, occ)| (OccurrenceId(idx as u32), occ))
    }

    /// Distinct bases, sorted
    pub fn bases(&self) -> BTreeSet<Base> {
        self.occurrences
            .iter()
            .filter_map(|occ| occ.base.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            occurrences: self.occurrences.len(),
            distinct_targets: self.by_target.len(),
            distinct_bases: self.bases().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_assigns_sequential_ids() {
        let mut arena = OccurrenceArena::new();
        let a = arena.alloc(Occurrence::new("File.open", "f.open()"));
        let b = arena.alloc(Occurrence::new("File.close", "f.close()"));

        assert_eq!(a, OccurrenceId(0));
        assert_eq!(b, OccurrenceId(1));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b).unwrap().target, "File.close");
        assert!(arena.get(OccurrenceId(7)).is_none());
    }

    #[test]
    fn test_by_target_index() {
        let mut arena = OccurrenceArena::new();
        let a = arena.alloc(Occurrence::new("File.read", "f.read()"));
        arena.alloc(Occurrence::new("File.close", "f.close()"));
        let c = arena.alloc(Occurrence::new("File.read", "g.read()"));

        assert_eq!(arena.by_target("File.read"), &[a, c]);
        assert!(arena.by_target("File.write").is_empty());
    }

    #[test]
    fn test_stats_and_bases() {
        let mut arena = OccurrenceArena::new();
        arena.alloc(Occurrence::new("A.f", "x.f()").with_base(Base::new("x")));
        arena.alloc(Occurrence::new("A.g", "x.g()").with_base(Base::new("x")));
        arena.alloc(Occurrence::new("A.f", "y.f()").with_base(Base::new("y")));
        arena.alloc(Occurrence::new("free", "free()"));

        let stats = arena.stats();
        assert_eq!(stats.occurrences, 4);
        assert_eq!(stats.distinct_targets, 3);
        assert_eq!(stats.distinct_bases, 2);
        assert_eq!(arena.code_of(OccurrenceId(3)), "free()");
        assert_eq!(arena.code_of(OccurrenceId(9)), "occ#9");
    }
}
