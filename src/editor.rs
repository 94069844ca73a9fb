//! The named-vs-local editing state machine.
//!
//! The editor is either selecting a rule from the library or building a
//! local tree; a selected id while in Create mode is unrepresentable. The
//! inactive side is stashed across mode switches, so toggling back and
//! forth loses nothing and neither representation mutates the other until
//! the user saves. Catalog list responses arrive asynchronously and are
//! guarded by an epoch token: a response that lands after the mode has
//! changed is discarded, not applied.

use crate::binding::EntityBinding;
use crate::catalog::CriteriaSummary;
use crate::types::{EligibilityCriteria, FieldRegistry, ValidationError};
use crate::validate::validate_embedded;

/// Which side of the editor is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Select,
    Create,
}

/// Ticket for an in-flight catalog load. Only the most recently issued
/// token is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// What a successful save produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Bind the entity to this library entry.
    UseNamed(String),
    /// Persist this local criteria embedded on the entity.
    SaveLocal(EligibilityCriteria),
}

#[derive(Debug)]
enum ModeState {
    Select { selected: Option<String> },
    Create { draft: Box<EligibilityCriteria> },
}

/// Editing session for one entity's eligibility binding.
#[derive(Debug)]
pub struct CriteriaEditor {
    state: ModeState,
    stashed_selection: Option<String>,
    stashed_draft: Option<Box<EligibilityCriteria>>,
    available: Vec<CriteriaSummary>,
    load_epoch: u64,
}

impl Default for CriteriaEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CriteriaEditor {
    /// A fresh session with no existing binding: Select mode, nothing
    /// chosen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ModeState::Select { selected: None },
            stashed_selection: None,
            stashed_draft: None,
            available: Vec::new(),
            load_epoch: 0,
        }
    }

    /// A session editing an existing binding: named references open in
    /// Select mode with the reference pre-selected, embedded trees open in
    /// Create mode on a copy of the tree.
    #[must_use]
    pub fn editing(binding: &EntityBinding) -> Self {
        let state = match binding {
            EntityBinding::Named { named_criteria_id } => ModeState::Select {
                selected: Some(named_criteria_id.clone()),
            },
            EntityBinding::Embedded { embedded_criteria } => ModeState::Create {
                draft: Box::new(embedded_criteria.clone()),
            },
        };
        Self {
            state,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        match self.state {
            ModeState::Select { .. } => EditorMode::Select,
            ModeState::Create { .. } => EditorMode::Create,
        }
    }

    /// Switch to building a local tree. The current selection is stashed;
    /// a previously stashed draft is restored, otherwise a blank local
    /// criteria is started. Outstanding catalog loads are invalidated.
    pub fn switch_to_create(&mut self) {
        if let ModeState::Select { selected } = &mut self.state {
            self.stashed_selection = selected.take();
            let draft = self
                .stashed_draft
                .take()
                .unwrap_or_else(|| Box::new(EligibilityCriteria::local()));
            self.state = ModeState::Create { draft };
            self.load_epoch += 1;
        }
    }

    /// Switch to selecting from the library, restoring any stashed
    /// selection. Outstanding catalog loads are invalidated.
    pub fn switch_to_select(&mut self) {
        if let ModeState::Create { draft } = &mut self.state {
            self.stashed_draft = Some(std::mem::replace(
                draft,
                Box::new(EligibilityCriteria::local()),
            ));
            self.state = ModeState::Select {
                selected: self.stashed_selection.take(),
            };
            self.load_epoch += 1;
        }
    }

    /// Start a catalog load. The returned token must accompany the
    /// response; older tokens are rejected.
    pub fn begin_catalog_load(&mut self) -> LoadToken {
        self.load_epoch += 1;
        LoadToken(self.load_epoch)
    }

    /// Deliver a catalog load response. Returns whether it was applied:
    /// stale tokens and responses arriving outside Select mode are
    /// discarded.
    pub fn apply_catalog_load(
        &mut self,
        token: LoadToken,
        summaries: Vec<CriteriaSummary>,
    ) -> bool {
        if token.0 != self.load_epoch || self.mode() != EditorMode::Select {
            return false;
        }
        self.available = summaries;
        true
    }

    /// The loaded library summaries.
    #[must_use]
    pub fn available(&self) -> &[CriteriaSummary] {
        &self.available
    }

    /// Loaded summaries whose name or description contains the filter,
    /// case-insensitively.
    #[must_use]
    pub fn search(&self, filter: &str) -> Vec<&CriteriaSummary> {
        let needle = filter.to_lowercase();
        self.available
            .iter()
            .filter(|summary| {
                summary.name.to_lowercase().contains(&needle)
                    || summary
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Choose a library entry. Only meaningful in Select mode; returns
    /// whether the selection was taken.
    pub fn select(&mut self, id: &str) -> bool {
        match &mut self.state {
            ModeState::Select { selected } => {
                *selected = Some(id.to_owned());
                true
            }
            ModeState::Create { .. } => false,
        }
    }

    /// The currently selected library id, if in Select mode.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            ModeState::Select { selected } => selected.as_deref(),
            ModeState::Create { .. } => None,
        }
    }

    /// The local draft, if in Create mode.
    #[must_use]
    pub fn draft(&self) -> Option<&EligibilityCriteria> {
        match &self.state {
            ModeState::Create { draft } => Some(draft),
            ModeState::Select { .. } => None,
        }
    }

    /// Mutable access to the local draft for builder edits.
    pub fn draft_mut(&mut self) -> Option<&mut EligibilityCriteria> {
        match &mut self.state {
            ModeState::Create { draft } => Some(draft),
            ModeState::Select { .. } => None,
        }
    }

    /// Validate and produce the save outcome. In Select mode a choice must
    /// have been made; in Create mode the draft must pass the structural
    /// checks, and a blank name gets the local placeholder.
    pub fn save(&self, registry: &FieldRegistry) -> Result<SaveOutcome, Vec<ValidationError>> {
        match &self.state {
            ModeState::Select { selected } => selected
                .clone()
                .map(SaveOutcome::UseNamed)
                .ok_or_else(|| vec![ValidationError::NoSelection]),
            ModeState::Create { draft } => {
                validate_embedded(draft, registry)?;
                let mut criteria = (**draft).clone();
                if criteria.name.trim().is_empty() {
                    criteria.name = "Local Rule".to_owned();
                }
                Ok(SaveOutcome::SaveLocal(criteria))
            }
        }
    }
}
