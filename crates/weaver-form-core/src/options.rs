use serde::{Deserialize, Serialize};

/// Page-level settings for a form.
///
/// Per-field settings live on the placeholder elements; these cover the
/// things that apply to the whole page. Every key is optional when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Tag name of placeholder elements.
    pub placeholder_tag: String,
    /// Selector for the form whose submit button is rerouted.
    pub form_selector: String,
    /// Whether to take over the form's submit button.
    pub reroute_submit: bool,
    /// `backdrop` option passed to upload modals.
    pub modal_backdrop: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            placeholder_tag: "editjs".to_string(),
            form_selector: "form[mode=editjs]".to_string(),
            reroute_submit: true,
            modal_backdrop: "static".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let options: FormOptions =
            serde_json::from_str(r#"{ "placeholderTag": "inplace" }"#).unwrap();
        assert_eq!(options.placeholder_tag, "inplace");
        assert_eq!(options.form_selector, "form[mode=editjs]");
        assert!(options.reroute_submit);
        assert_eq!(options.modal_backdrop, "static");
    }
}
