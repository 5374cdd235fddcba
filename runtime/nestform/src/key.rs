//! Build the bracketed keys used to address nested values in a flat form.
//!
//! Nesting is encoded in the key itself, following the convention popularised by Rails:
//!
//! - `tags[]=a&tags[]=b` is a list, addressed with [`list_element`];
//! - `user[name]=John` is a record field, addressed with [`record_field`];
//! - `items[][id]=1` is a record inside a list, built by composing the two.
//!
//! Brackets inside field names are not escaped: keys are compared by exact
//! string equality or prefix.

/// The key shared by every element of the list stored under `parent`.
///
/// ```rust
/// assert_eq!(nestform::key::list_element("items"), "items[]");
/// assert_eq!(nestform::key::list_element("user[tags]"), "user[tags][]");
/// ```
pub fn list_element(parent: &str) -> String {
    let mut key = String::with_capacity(parent.len() + 2);
    key.push_str(parent);
    key.push_str("[]");
    key
}

/// The key of the field named `field` in the record stored under `parent`.
///
/// ```rust
/// assert_eq!(nestform::key::record_field("user", "name"), "user[name]");
/// assert_eq!(nestform::key::record_field("items[]", "id"), "items[][id]");
/// ```
pub fn record_field(parent: &str, field: &str) -> String {
    let mut key = String::with_capacity(parent.len() + field.len() + 2);
    key.push_str(parent);
    key.push('[');
    key.push_str(field);
    key.push(']');
    key
}
