use anyhow::{Context as _, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::Display;
use tera::{Context, Tera, Value};
use tracing::debug;

use crate::categorize::{categorize_value, Categorized, InterfaceOrder};

/// Name under which the filter is registered in templates.
pub const FILTER_NAME: &str = "categorize_wireless";

/// Name of the built-in summary template.
pub const SUMMARY_TEMPLATE: &str = "summary.txt";

const SUMMARY_SOURCE: &str = r#"
{%- set groups = wireless | categorize_wireless(order=order) -%}
{%- for mode, entries in groups %}{% if mode != "all" %}
{{ mode }}:
{%- for entry in entries %}
  {{ entry.iface }} on {{ entry.device }} ({{ entry.htmode }})
{%- endfor %}
{%- endif %}{% endfor %}
total: {{ groups.all | length }} interface(s)
"#;

lazy_static! {
    pub static ref BUILTIN_TEMPLATES: Tera = {
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template(SUMMARY_TEMPLATE, SUMMARY_SOURCE)
            .expect("built-in summary template parses");
        tera
    };
}

/// Tera filter: `{{ wireless | categorize_wireless(order="index") }}`.
///
/// Every failure is reported as a single `categorize_wireless plugin error`
/// naming the offending section and field.
pub fn categorize_wireless(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let order = match args.get("order") {
        Some(Value::String(s)) => s.parse::<InterfaceOrder>().map_err(plugin_error)?,
        Some(other) => return Err(plugin_error(format!("order must be a string, got {}", other))),
        None => InterfaceOrder::default(),
    };

    categorize_value(value, order)
        .and_then(Categorized::into_value)
        .map_err(plugin_error)
}

fn plugin_error(cause: impl Display) -> tera::Error {
    tera::Error::msg(format!("{} plugin error: {}", FILTER_NAME, cause))
}

pub fn register_filters(tera: &mut Tera) {
    tera.register_filter(FILTER_NAME, categorize_wireless);
}

/// Loads user templates matching `glob` with the wireless filters registered.
pub fn load_templates(glob: &str) -> Result<Tera> {
    let mut tera =
        Tera::new(glob).with_context(|| format!("Failed to load templates from {}", glob))?;
    register_filters(&mut tera);
    debug!(glob, templates = tera.get_template_names().count(), "loaded templates");
    Ok(tera)
}

/// Renders `name` with the raw dump bound to `wireless` and the ordering to `order`.
pub fn render(tera: &Tera, name: &str, wireless: &Value, order: InterfaceOrder) -> Result<String> {
    let mut context = Context::new();
    context.insert("wireless", wireless);
    context.insert("order", order.as_str());

    tera.render(name, &context)
        .with_context(|| format!("Failed to render template '{}'", name))
}

pub fn render_summary(wireless: &Value, order: InterfaceOrder) -> Result<String> {
    render(&BUILTIN_TEMPLATES, SUMMARY_TEMPLATE, wireless, order)
}
