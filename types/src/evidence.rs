use serde::{Deserialize, Serialize};

use crate::{EvidenceId, NonEmptyString, Timeline};

/// A clue in the case file.
///
/// Evidence is immutable once it enters the case file; the only field that is
/// filled in late is the origin timeline, which the controller stamps when the
/// clue is collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    id: EvidenceId,
    name: NonEmptyString,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeline: Option<Timeline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis_data: Option<AnalysisData>,
}

/// Lab findings attached to a clue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub findings: Vec<String>,
    /// Confidence of the analysis in `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,
}

impl Evidence {
    #[must_use]
    pub fn new(id: EvidenceId, name: NonEmptyString, description: impl Into<String>) -> Self {
        Self {
            id,
            name,
            description: description.into(),
            timeline: None,
            analysis_data: None,
        }
    }

    /// Convenience constructor for static content tables.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `name` are invalid; only use with literals.
    #[must_use]
    pub fn from_static(id: &'static str, name: &'static str, description: &'static str) -> Self {
        Self::new(
            EvidenceId::new(id).expect("static evidence id must be valid"),
            NonEmptyString::new(name).expect("static evidence name must be non-empty"),
            description,
        )
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    #[must_use]
    pub fn with_analysis(mut self, analysis: AnalysisData) -> Self {
        self.analysis_data = Some(analysis);
        self
    }

    /// Stamp the origin timeline unless one is already recorded.
    #[must_use]
    pub fn tagged_or(mut self, timeline: Timeline) -> Self {
        if self.timeline.is_none() {
            self.timeline = Some(timeline);
        }
        self
    }

    #[must_use]
    pub fn id(&self) -> &EvidenceId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn timeline(&self) -> Option<Timeline> {
        self.timeline
    }

    #[must_use]
    pub fn analysis_data(&self) -> Option<&AnalysisData> {
        self.analysis_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_or_keeps_existing_origin() {
        let clue = Evidence::from_static("family_photo_beta", "Family Photo", "Reconciliation")
            .with_timeline(Timeline::Beta);
        assert_eq!(clue.tagged_or(Timeline::Delta).timeline(), Some(Timeline::Beta));

        let untagged = Evidence::from_static("note", "Note", "");
        assert_eq!(
            untagged.tagged_or(Timeline::Gamma).timeline(),
            Some(Timeline::Gamma)
        );
    }

    #[test]
    fn deserialize_rejects_blank_name() {
        let json = serde_json::json!({ "id": "x", "name": "  ", "description": "d" });
        assert!(serde_json::from_value::<Evidence>(json).is_err());
    }

    #[test]
    fn deserialize_accepts_camel_case_analysis() {
        let json = serde_json::json!({
            "id": "poison_syringe_alpha",
            "name": "Poison Syringe",
            "description": "Untraceable compound",
            "timeline": "alpha",
            "analysisData": { "findings": ["Chen's fingerprints"], "confidence": 0.9 }
        });
        let clue: Evidence = serde_json::from_value(json).unwrap();
        assert_eq!(clue.timeline(), Some(Timeline::Alpha));
        assert_eq!(clue.analysis_data().unwrap().findings.len(), 1);
    }

    #[test]
    fn analysis_is_written_only_when_present() {
        let plain = Evidence::from_static("coffee", "Coffee Cup", "");
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("analysisData").is_none());

        let analysed = plain.with_analysis(AnalysisData {
            findings: vec!["Unknown lipstick".to_string()],
            confidence: 0.5,
        });
        let json = serde_json::to_value(&analysed).unwrap();
        assert_eq!(json["analysisData"]["findings"][0], "Unknown lipstick");
        assert_eq!(json["analysisData"]["confidence"], 0.5);
    }
}
