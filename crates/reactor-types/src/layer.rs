use serde::{Deserialize, Serialize};

/// Kind of an annular layer in a radial or vertical build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Empty region. Contributes to radial accounting only.
    Gap,
    /// Produces a body.
    Solid,
    /// The plasma region. Exactly one per build.
    Plasma,
}

/// Which end of the machine a divertor sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivertorRole {
    #[serde(rename = "lower_divertor")]
    Lower,
    #[serde(rename = "upper_divertor")]
    Upper,
}

impl DivertorRole {
    /// Body name used for the divertor in an assembly.
    pub fn name(self) -> &'static str {
        match self {
            DivertorRole::Lower => "lower_divertor",
            DivertorRole::Upper => "upper_divertor",
        }
    }

    /// Sign of the vertical extent: +1 above the midplane, -1 below.
    pub fn z_sign(self) -> f64 {
        match self {
            DivertorRole::Lower => -1.0,
            DivertorRole::Upper => 1.0,
        }
    }
}

/// Tag carried by a build entry.
///
/// Plasma builds only use [`LayerTag::Kind`]; divertor builds pair a gap with
/// a [`LayerTag::Divertor`]. Keeping both in one tag lets a single sequence
/// type carry either form, so the validator can reject misplaced roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerTag {
    Kind(LayerKind),
    Divertor(DivertorRole),
}

impl From<LayerKind> for LayerTag {
    fn from(kind: LayerKind) -> Self {
        LayerTag::Kind(kind)
    }
}

impl From<DivertorRole> for LayerTag {
    fn from(role: DivertorRole) -> Self {
        LayerTag::Divertor(role)
    }
}

/// One `(tag, thickness)` pair of a build. Serialized as a two-element array,
/// e.g. `["gap", 10.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(LayerTag, f64)", into = "(LayerTag, f64)")]
pub struct BuildEntry {
    pub tag: LayerTag,
    pub thickness: f64,
}

impl BuildEntry {
    pub fn new(tag: impl Into<LayerTag>, thickness: f64) -> Self {
        Self {
            tag: tag.into(),
            thickness,
        }
    }

    pub fn gap(thickness: f64) -> Self {
        Self::new(LayerKind::Gap, thickness)
    }

    pub fn solid(thickness: f64) -> Self {
        Self::new(LayerKind::Solid, thickness)
    }

    pub fn plasma(thickness: f64) -> Self {
        Self::new(LayerKind::Plasma, thickness)
    }

    pub fn divertor(role: DivertorRole, thickness: f64) -> Self {
        Self::new(role, thickness)
    }

    /// The layer kind, or `None` for divertor roles.
    pub fn kind(&self) -> Option<LayerKind> {
        match self.tag {
            LayerTag::Kind(kind) => Some(kind),
            LayerTag::Divertor(_) => None,
        }
    }

    pub fn is(&self, kind: LayerKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl From<(LayerTag, f64)> for BuildEntry {
    fn from((tag, thickness): (LayerTag, f64)) -> Self {
        Self { tag, thickness }
    }
}

impl From<BuildEntry> for (LayerTag, f64) {
    fn from(entry: BuildEntry) -> Self {
        (entry.tag, entry.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_serialize_as_pairs() {
        let build = vec![
            BuildEntry::gap(10.0),
            BuildEntry::plasma(300.0),
            BuildEntry::divertor(DivertorRole::Lower, 50.0),
        ];
        let json = serde_json::to_string(&build).unwrap();
        assert_eq!(
            json,
            r#"[["gap",10.0],["plasma",300.0],["lower_divertor",50.0]]"#
        );
        let back: Vec<BuildEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, build);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let parsed: Result<BuildEntry, _> = serde_json::from_str(r#"["wall", 10.0]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn divertor_roles_have_no_layer_kind() {
        let entry = BuildEntry::divertor(DivertorRole::Upper, 5.0);
        assert_eq!(entry.kind(), None);
        assert_eq!(DivertorRole::Upper.name(), "upper_divertor");
        assert_eq!(DivertorRole::Lower.z_sign(), -1.0);
    }
}
