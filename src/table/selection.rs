//! Single-row selection backing a detail drawer.

use crate::record::RecordId;

/// At most one record is selected at a time; selecting another replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoneSelected,
    Selected(RecordId),
}

impl Selection {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Selection::NoneSelected => None,
            Selection::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }
}
