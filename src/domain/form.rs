use super::enums::{FormField, FormMode};
use super::task::{Task, TaskDraft};
use chrono::NaiveDate;

/// Form input rejected before any request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Select a date in the calendar first")]
    NoDateSelected,
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle => "title",
            ValidationError::NoDateSelected => "date",
        }
    }
}

/// Task form contents and its create/edit mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub field: FormField,
    pub mode: FormMode,
}

impl TaskForm {
    /// Form pre-filled from an existing task, in edit mode
    pub fn edit(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            field: FormField::Title,
            mode: FormMode::Edit(task.id),
        }
    }

    /// Back to an empty create form
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn push_char(&mut self, c: char) {
        match self.field {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            FormField::Title => self.title.pop(),
            FormField::Description => self.description.pop(),
        };
    }

    /// Check the form and build the request body.
    ///
    /// `completed` is left unset: an edit takes it from the store when the
    /// request is dispatched.
    pub fn validate(&self, selected_date: Option<NaiveDate>) -> Result<TaskDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if selected_date.is_none() {
            return Err(ValidationError::NoDateSelected);
        }
        Ok(TaskDraft::new(title, self.description.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 3, 15)
    }

    #[test]
    fn test_validate_requires_title_and_date() {
        let mut form = TaskForm::default();
        assert_eq!(form.validate(date()), Err(ValidationError::EmptyTitle));

        form.title = "  Buy milk ".to_string();
        assert_eq!(form.validate(None), Err(ValidationError::NoDateSelected));
        assert_eq!(ValidationError::NoDateSelected.field(), "date");

        let draft = form.validate(date()).unwrap();
        assert_eq!(draft, TaskDraft::new("Buy milk", ""));
    }

    #[test]
    fn test_typing_goes_to_active_field() {
        let mut form = TaskForm::default();
        form.push_char('a');
        form.toggle_field();
        form.push_char('b');
        form.push_char('c');
        form.backspace();

        assert_eq!(form.title, "a");
        assert_eq!(form.description, "b");
    }

    #[test]
    fn test_edit_and_reset() {
        let task = Task {
            id: 3,
            title: "Old".to_string(),
            description: "desc".to_string(),
            completed: true,
            created_at: None,
        };
        let mut form = TaskForm::edit(&task);
        assert_eq!(form.mode, FormMode::Edit(3));
        // The form never carries the completion flag
        assert_eq!(form.validate(date()), Ok(TaskDraft::new("Old", "desc")));

        form.reset();
        assert_eq!(form, TaskForm::default());
        assert_eq!(form.mode, FormMode::Create);
    }
}
