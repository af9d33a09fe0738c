//! # oxide-magic-form
//!
//! Schema-driven forms with typed state, required-field validation and
//! Bootstrap 5 rendering.
//!
//! This crate provides:
//! - Declarative form schemas (builders or JSON)
//! - A [`FormRenderer`] owning values, errors and image previews
//! - Required-field validation on submit
//! - Grouped, row/column layouts rendered with Bootstrap 5 classes
//! - Editable table fields and a searchable [`Combobox`]
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_magic_form::{ChangeEvent, FieldSpec, FormOptions, FormRenderer, FormSchema};
//!
//! let schema = FormSchema::single(vec![
//!     FieldSpec::text("username", "Username").required(),
//!     FieldSpec::checkbox("newsletter", "Subscribe"),
//! ])
//! .unwrap();
//!
//! let mut form = FormRenderer::new(schema, FormOptions::new().title("Sign up"))
//!     .on_submit(|data| println!("{}", data.to_json()));
//!
//! // Nothing typed yet: submission is blocked.
//! assert!(!form.handle_submit());
//! assert_eq!(form.error("username"), Some("This field is required"));
//!
//! form.handle_change("username", ChangeEvent::Value("alice".into()))
//!     .unwrap();
//! assert!(form.handle_submit());
//!
//! let html = form.render();
//! assert!(html.contains("Sign up"));
//! ```
//!
//! ## Loading a Schema from JSON
//!
//! ```rust
//! use oxide_magic_form::FormSchema;
//!
//! let schema = FormSchema::from_json(r#"{
//!     "groups": [{
//!         "groupKey": "profile",
//!         "title": "Profile",
//!         "layout": { "type": "grid", "columns": 2 },
//!         "fields": [
//!             { "name": "first", "label": "First name", "type": "text", "required": true },
//!             { "name": "role", "label": "Role", "type": "select",
//!               "options": [{ "value": "admin", "displayName": "Administrator" }] }
//!         ]
//!     }]
//! }"#)
//! .unwrap();
//!
//! assert_eq!(schema.fields().count(), 2);
//! ```

mod error;
pub mod combobox;
mod form;
pub mod layout;
mod options;
pub mod preview;
mod schema;
pub mod table;
pub mod validation;
mod value;
pub mod widgets;

pub use combobox::{ComboItem, Combobox, Selection};
pub use error::{FormError, Result, ValidationErrors, REQUIRED_MESSAGE};
pub use form::{ChangeEvent, FormMsg, FormRenderer};
pub use options::{FormOptions, ModalOptions};
pub use preview::{ObjectUrlRegistry, PreviewProvider, PreviewUrl};
pub use schema::{
    FieldKind, FieldSpec, FieldWidth, FormSchema, GroupLayout, GroupPosition, GroupSpec,
    GroupWidth, LayoutKind, SelectOption,
};
pub use value::{FieldValue, FileRef, FormData, TableRow};
