//! Markdown rendering of a [`ModuleInfo`].
//!
//! Output is deterministic for a given model. It is a terminal artifact: nothing
//! parses the generated markdown back into a model.

pub mod api;
pub mod database;

use crate::module_info::ModuleInfo;
use log::debug;

/// File name of the API reference inside the module directory.
pub const API_FILE: &str = "API.md";
/// File name of the schema reference inside the module directory.
pub const DATABASE_FILE: &str = "DATABASE.md";

/// Both documents for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocs {
    pub api: String,
    pub database: String,
}

/// Renders the API and schema references.
pub struct DocRenderer;

impl DocRenderer {
    pub fn render(info: &ModuleInfo) -> RenderedDocs {
        debug!("Rendering documentation for {}", info.name);
        RenderedDocs {
            api: api::render(info),
            database: database::render(info),
        }
    }
}

/// Capitalises the first letter of every word and lower-cases the rest.
///
/// A word starts after any non-alphabetic character, so `customer_invoices`
/// becomes `Customer_Invoices`.
pub(crate) fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(c);
            at_word_start = true;
        }
    }
    titled
}

/// Title used by both documents, e.g. `Customer Invoices` for `customer.invoices`.
pub(crate) fn module_title(info: &ModuleInfo) -> String {
    title_case(&info.name.replace('.', " "))
}
