//! Query backends and shared result shapes.
//!
//! Both engines implement [`QueryBackend`] with identical signatures, so a
//! caller can switch backends transparently. Raw engine output is shaped
//! through the normalizer helpers here into sorted, deduplicated
//! collections, which is what makes cross-backend results directly
//! comparable.

mod emulated;
mod native;

pub use emulated::DocumentQueryEngine;
pub use native::NativeQueryEngine;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::errors::HetGraphError;

/// What is known about a disease: treating/palliating compounds, associated
/// genes, and localized anatomy. Name lists are sorted and deduplicated;
/// a disease with no incident edges has three empty lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiseaseProfile {
    pub disease_name: String,
    pub compound_names: Vec<String>,
    pub gene_names: Vec<String>,
    pub anatomy_names: Vec<String>,
}

/// A compound proposed as a new treatment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TreatmentCandidate {
    pub drug_id: String,
    pub drug_name: String,
}

/// Unified query surface over either backend.
pub trait QueryBackend {
    /// Profile of the disease with the given id. A missing anchor (no node
    /// with that id and kind `Disease`) is [`HetGraphError::NotFound`].
    fn disease_profile(&self, disease_id: &str) -> Result<DiseaseProfile, HetGraphError>;

    /// Compounds satisfying the opposite-regulation motif against the
    /// disease's anatomy, excluding compounds that already treat it.
    /// Always a (possibly empty) list; an absent disease matches nothing.
    fn treatment_candidates(
        &self,
        disease_id: &str,
    ) -> Result<Vec<TreatmentCandidate>, HetGraphError>;
}

impl<B> QueryBackend for &B
where
    B: QueryBackend + ?Sized,
{
    fn disease_profile(&self, disease_id: &str) -> Result<DiseaseProfile, HetGraphError> {
        (*self).disease_profile(disease_id)
    }

    fn treatment_candidates(
        &self,
        disease_id: &str,
    ) -> Result<Vec<TreatmentCandidate>, HetGraphError> {
        (*self).treatment_candidates(disease_id)
    }
}

pub(crate) fn sorted_names(names: AHashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = names.into_iter().collect();
    out.sort_unstable();
    out
}

pub(crate) fn sorted_candidates(by_id: AHashMap<String, String>) -> Vec<TreatmentCandidate> {
    let mut out: Vec<TreatmentCandidate> = by_id
        .into_iter()
        .map(|(drug_id, drug_name)| TreatmentCandidate { drug_id, drug_name })
        .collect();
    out.sort();
    out
}
