use super::task::TaskId;

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    EditingForm,
    /// Waiting for y/n before deleting a task
    ConfirmDelete(TaskId),
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Left pane: calendar grid, or the day list when a date is selected
    Left,
    Map,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Left => Focus::Map,
            Focus::Map => Focus::Left,
        }
    }
}

/// Task form state machine: create by default, edit after picking a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(TaskId),
}

impl FormMode {
    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Add task",
            FormMode::Edit(_) => "Update task",
        }
    }
}

/// Field of the task form that receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        }
    }
}
