//! Permission resolution: capability references to capability names.

use std::collections::BTreeSet;
use std::sync::Arc;

use opsdash_types::CapabilityId;
use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogRecords;

/// The capability names held by the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedCapabilitySet(BTreeSet<String>);

impl ResolvedCapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_subset(&self, other: &ResolvedCapabilitySet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ResolvedCapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Resolves `refs` against the catalog.
///
/// A name is in the result iff some record with that name has its id in
/// `refs`. The `active` flag is not consulted. Ids without a record are stale
/// references and are skipped.
pub fn resolve(refs: &[CapabilityId], records: &CatalogRecords) -> ResolvedCapabilitySet {
    let mut names = BTreeSet::new();
    for id in refs {
        match records.get(id) {
            Some(record) => {
                names.insert(record.name.clone());
            }
            None => debug!(%id, "ignoring capability reference without a catalog record"),
        }
    }
    ResolvedCapabilitySet(names)
}

/// Memoizing wrapper around [`resolve`].
///
/// Inputs are compared by allocation identity: the result is recomputed only
/// when the user's references or the catalog records are a different `Arc`.
#[derive(Debug, Default)]
pub struct PermissionResolver {
    cached: Option<Memo>,
}

#[derive(Debug)]
struct Memo {
    refs: Arc<[CapabilityId]>,
    records: Arc<CatalogRecords>,
    resolved: Arc<ResolvedCapabilitySet>,
}

impl PermissionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, refs: &Arc<[CapabilityId]>, records: &Arc<CatalogRecords>) -> Arc<ResolvedCapabilitySet> {
        if let Some(memo) = &self.cached
            && Arc::ptr_eq(&memo.refs, refs)
            && Arc::ptr_eq(&memo.records, records)
        {
            return Arc::clone(&memo.resolved);
        }

        let resolved = Arc::new(resolve(refs, records));
        debug!(count = resolved.len(), "resolved capabilities");
        self.cached = Some(Memo {
            refs: Arc::clone(refs),
            records: Arc::clone(records),
            resolved: Arc::clone(&resolved),
        });
        resolved
    }
}

#[cfg(test)]
mod tests {
    use opsdash_types::CapabilityRecord;

    use super::*;

    fn catalog(records: Vec<CapabilityRecord>) -> CatalogRecords {
        records.into_iter().map(|record| (record.id.clone(), record)).collect()
    }

    fn refs(ids: &[u64]) -> Vec<CapabilityId> {
        ids.iter().copied().map(CapabilityId::from).collect()
    }

    #[test]
    fn resolves_names_and_ignores_stale_refs() {
        let records = catalog(vec![CapabilityRecord::new(1u64, "reports"), CapabilityRecord::new(2u64, "admin")]);
        let resolved = resolve(&refs(&[1, 99]), &records);
        assert_eq!(resolved.iter().collect::<Vec<_>>(), vec!["reports"]);
    }

    #[test]
    fn inactive_records_still_grant() {
        let records = catalog(vec![CapabilityRecord::new(1u64, "reports").inactive()]);
        assert!(resolve(&refs(&[1]), &records).contains("reports"));
    }

    #[test]
    fn duplicate_names_collapse() {
        let records = catalog(vec![CapabilityRecord::new(1u64, "reports"), CapabilityRecord::new(2u64, "reports")]);
        let resolved = resolve(&refs(&[1, 2, 1]), &records);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn empty_refs_resolve_to_nothing() {
        let records = catalog(vec![CapabilityRecord::new(1u64, "reports")]);
        assert!(resolve(&[], &records).is_empty());
    }

    #[test]
    fn memoizes_on_input_identity() {
        let mut resolver = PermissionResolver::new();
        let records = Arc::new(catalog(vec![CapabilityRecord::new(1u64, "reports")]));
        let user_refs: Arc<[CapabilityId]> = refs(&[1]).into();

        let first = resolver.resolve(&user_refs, &records);
        let second = resolver.resolve(&user_refs, &records);
        assert!(Arc::ptr_eq(&first, &second));

        let equal_but_new: Arc<[CapabilityId]> = refs(&[1]).into();
        let third = resolver.resolve(&equal_but_new, &records);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
