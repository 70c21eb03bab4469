//! MiniJinja filter registration.

use minijinja::{Environment, Value};

/// Registers the provider's utility filters on a MiniJinja environment.
///
/// * `nl` appends a newline: `{{ content | nl }}`.
/// * `or_blank` renders undefined or none values as an empty string, which
///   keeps markup clean when a view renders without record data.
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });

    env.add_filter("or_blank", |value: Value| -> String {
        if value.is_undefined() || value.is_none() {
            String::new()
        } else {
            value.to_string()
        }
    });
}
