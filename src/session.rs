use crate::models::ColumnId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingRef {
    pub task_id: String,
    pub column: ColumnId,
}

/// Which task the user is currently editing.
///
/// Presentation-local: never stored with the board snapshot.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    editing: Option<EditingRef>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_editing_task(&mut self, task_id: impl Into<String>, column: ColumnId) {
        self.editing = Some(EditingRef {
            task_id: task_id.into(),
            column,
        });
    }

    pub fn clear_editing_task(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&EditingRef> {
        self.editing.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut session = EditSession::new();
        assert!(session.editing().is_none());

        session.set_editing_task("task-1", ColumnId::Backlog);
        assert_eq!(
            session.editing(),
            Some(&EditingRef {
                task_id: "task-1".into(),
                column: ColumnId::Backlog
            })
        );

        session.set_editing_task("task-2", ColumnId::Done);
        assert_eq!(session.editing().unwrap().task_id, "task-2");

        session.clear_editing_task();
        assert!(session.editing().is_none());
    }
}
