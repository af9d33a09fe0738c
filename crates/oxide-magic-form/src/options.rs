//! FormRenderer configuration options.

/// How the form is presented and when initial values apply.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Heading shown above the form (or in the dialog header).
    pub title: String,
    /// Label of the submit button.
    pub submit_label: String,
    /// While set, initial values do not reset the form state.
    pub loading: bool,
    /// Wraps the form in a dialog opened by a trigger button.
    pub modal: Option<ModalOptions>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            title: "Form".to_string(),
            submit_label: "Submit".to_string(),
            loading: false,
            modal: None,
        }
    }
}

impl FormOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the heading.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the submit button label.
    #[must_use]
    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    /// Sets the loading flag.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Presents the form in a dialog opened by a button labelled `trigger_label`.
    #[must_use]
    pub fn modal(mut self, trigger_label: impl Into<String>) -> Self {
        self.modal = Some(ModalOptions::new(trigger_label));
        self
    }
}

/// Dialog presentation settings.
#[derive(Debug, Clone)]
pub struct ModalOptions {
    /// Label of the button opening the dialog.
    pub trigger_label: String,
    /// DOM id of the dialog.
    pub dialog_id: String,
}

impl ModalOptions {
    pub fn new(trigger_label: impl Into<String>) -> Self {
        Self {
            trigger_label: trigger_label.into(),
            dialog_id: "magic-form-modal".to_string(),
        }
    }

    /// Sets the DOM id of the dialog.
    #[must_use]
    pub fn dialog_id(mut self, id: impl Into<String>) -> Self {
        self.dialog_id = id.into();
        self
    }
}
