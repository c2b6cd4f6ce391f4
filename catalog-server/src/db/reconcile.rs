//! Diffing for owned child collections
//!
//! Product updates carry the full intended set of variants/images. The
//! diff against the stored rows decides what to delete, update in place,
//! or insert. Entries referencing an id that no longer exists are treated
//! as inserts rather than rejected.

use std::collections::HashSet;
use uuid::Uuid;

/// Outcome of diffing a submitted child set against the stored one
#[derive(Debug, PartialEq, Eq)]
pub struct Reconciliation<T> {
    /// Stored rows absent from the submitted set
    pub delete_ids: Vec<Uuid>,
    /// Submitted entries matching a stored row, updated in place
    pub updates: Vec<(Uuid, T)>,
    /// Submitted entries without a (known) id
    pub inserts: Vec<T>,
}

/// Diff `submitted` (entries with an optional id) against `existing` ids.
pub fn reconcile_by_id<T>(
    existing: &[Uuid],
    submitted: Vec<(Option<Uuid>, T)>,
) -> Reconciliation<T> {
    let known: HashSet<Uuid> = existing.iter().copied().collect();

    let mut updates = Vec::new();
    let mut inserts = Vec::new();
    let mut kept = HashSet::new();
    for (id, entry) in submitted {
        match id {
            Some(id) if known.contains(&id) => {
                kept.insert(id);
                updates.push((id, entry));
            }
            _ => inserts.push(entry),
        }
    }

    let delete_ids = existing
        .iter()
        .filter(|id| !kept.contains(id))
        .copied()
        .collect();

    Reconciliation {
        delete_ids,
        updates,
        inserts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_submission_deletes_everything() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let diff = reconcile_by_id::<&str>(&[a, b], vec![]);
        assert_eq!(diff.delete_ids.len(), 2);
        assert!(diff.updates.is_empty());
        assert!(diff.inserts.is_empty());
    }

    #[test]
    fn splits_into_delete_update_insert() {
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let diff = reconcile_by_id(
            &[keep, drop],
            vec![(Some(keep), "renamed"), (None, "brand new")],
        );
        assert_eq!(diff.delete_ids, vec![drop]);
        assert_eq!(diff.updates, vec![(keep, "renamed")]);
        assert_eq!(diff.inserts, vec!["brand new"]);
    }

    #[test]
    fn unknown_id_is_treated_as_insert() {
        let existing = Uuid::new_v4();
        let stale = Uuid::new_v4();
        let diff = reconcile_by_id(&[existing], vec![(Some(stale), "moved over")]);
        assert_eq!(diff.delete_ids, vec![existing]);
        assert!(diff.updates.is_empty());
        assert_eq!(diff.inserts, vec!["moved over"]);
    }
}
