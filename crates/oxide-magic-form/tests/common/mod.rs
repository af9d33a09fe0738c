#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use oxide_magic_form::{
    FieldSpec, FileRef, FormData, FormOptions, FormRenderer, FormSchema, GroupSpec,
    PreviewProvider, PreviewUrl, SelectOption,
};

/// Submissions captured by a form's submit callback.
pub type Submissions = Rc<RefCell<Vec<FormData>>>;

/// Builds a form over `schema` that records every submission.
pub fn recording_form(schema: FormSchema, options: FormOptions) -> (FormRenderer, Submissions) {
    let submissions: Submissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&submissions);
    let form = FormRenderer::new(schema, options)
        .on_submit(move |data| sink.borrow_mut().push(data.clone()));
    (form, submissions)
}

pub fn single(fields: Vec<FieldSpec>) -> FormSchema {
    FormSchema::single(fields).unwrap_or_else(|e| panic!("Invalid schema: {e}"))
}

pub fn roles() -> Vec<SelectOption> {
    vec![
        SelectOption::new("admin", "Administrator"),
        SelectOption::new("editor", "Editor"),
        SelectOption::new("viewer", "Viewer"),
    ]
}

/// A two-row schema covering every field kind.
pub fn profile_schema() -> FormSchema {
    FormSchema::new(vec![
        GroupSpec::new(
            "account",
            vec![
                FieldSpec::text("username", "Username").required(),
                FieldSpec::number("age", "Age"),
                FieldSpec::date("birthday", "Birthday"),
            ],
        )
        .title("Account")
        .grid(3)
        .at(0, 0),
        GroupSpec::new(
            "about",
            vec![
                FieldSpec::textarea("bio", "Bio", 3),
                FieldSpec::checkbox("newsletter", "Subscribe"),
                FieldSpec::radio("plan", "Plan", roles()),
                FieldSpec::image("avatar", "Avatar"),
            ],
        )
        .title("About")
        .at(1, 0),
        GroupSpec::new(
            "access",
            vec![
                FieldSpec::select("role", "Role", roles()),
                FieldSpec::autocomplete("teams", "Teams", roles(), true),
                FieldSpec::table(
                    "links",
                    "Links",
                    vec![FieldSpec::text("url", "URL"), FieldSpec::text("label", "Label")],
                ),
            ],
        )
        .title("Access")
        .at(1, 1),
    ])
    .unwrap_or_else(|e| panic!("Invalid schema: {e}"))
}

/// Preview provider that logs every acquire and release.
#[derive(Clone, Default)]
pub struct RecordingPreviews {
    pub created: Rc<RefCell<Vec<String>>>,
    pub revoked: Rc<RefCell<Vec<String>>>,
}

impl RecordingPreviews {
    pub fn live(&self) -> usize {
        self.created.borrow().len() - self.revoked.borrow().len()
    }
}

impl PreviewProvider for RecordingPreviews {
    fn create(&mut self, file: &FileRef) -> PreviewUrl {
        let url = format!("blob:test/{}", file.name);
        self.created.borrow_mut().push(url.clone());
        PreviewUrl::new(url)
    }

    fn revoke(&mut self, url: &PreviewUrl) {
        self.revoked.borrow_mut().push(url.as_str().to_string());
    }
}
