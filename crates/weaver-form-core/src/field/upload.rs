//! File and image upload fields.
//!
//! Uploads are not backed by an options list. They either expose a native
//! file picker or hand off to an external drag-and-drop widget living in a
//! modal dialog (`use-dropzonejs="true"`), in which case the page's widget
//! reports completed uploads back through [`Form::complete_upload`].
//!
//! [`Form::complete_upload`]: crate::Form::complete_upload

use std::fmt;

use crate::dom::DomPort;
use crate::html::Markup;
use crate::FormError;

use super::{FieldCore, FieldRenderer};

const DEFAULT_MAX_FILES: u32 = 1;
const DEFAULT_ACCEPT_TYPES: &str = "image/png,image/jpg";
const DEFAULT_MAX_SIZE_MB: u32 = 2;

const PREVIEW_STYLE: &str = "width: 220px !important; opacity: 1 !important;";

/// Plain file list or single image preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    File,
    Image,
}

/// Knobs read from the field's current attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub max_files: u32,
    pub use_external_widget: bool,
    pub accept_types: Vec<String>,
    pub max_size_mb: u32,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            use_external_widget: false,
            accept_types: split_types(DEFAULT_ACCEPT_TYPES),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
        }
    }
}

impl UploadSettings {
    pub fn from_field(field: &FieldCore) -> Self {
        let attrs = &field.attributes;
        let defaults = Self::default();
        Self {
            max_files: parse_number(field, "maxfiles", defaults.max_files),
            use_external_widget: attrs.common("use-dropzonejs") == Some("true"),
            accept_types: attrs
                .common("accept-types")
                .map(split_types)
                .unwrap_or(defaults.accept_types),
            max_size_mb: parse_number(field, "accept-maxsize", defaults.max_size_mb),
        }
    }

    /// The `accept` attribute value for a native picker.
    pub fn accept(&self) -> String {
        self.accept_types.join(",")
    }
}

fn split_types(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(field: &FieldCore, name: &str, default: u32) -> u32 {
    let Some(raw) = field.attributes.common(name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(
                field = %field.ids.element,
                attribute = name,
                value = raw,
                "ignoring unparsable upload setting"
            );
            default
        }
    }
}

/// Upload field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadEditor {
    /// Message from the last failed upload, shown in view mode.
    error: Option<String>,
}

impl UploadEditor {
    /// `image` in the `type` attribute picks the image preview; anything else
    /// is a file list.
    pub fn kind(field: &FieldCore) -> UploadKind {
        match field.attributes.common("type") {
            Some(t) if t.eq_ignore_ascii_case("image") => UploadKind::Image,
            _ => UploadKind::File,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Id of the modal hosting the external widget.
    pub fn popup_id<'a>(field: &'a FieldCore) -> Option<&'a str> {
        field.attributes.common("popupform-id")
    }

    fn write_picker(
        html: &mut Markup,
        kind: UploadKind,
        settings: &UploadSettings,
        prompt: &str,
    ) -> fmt::Result {
        html.raw("<p>")?;
        html.text(prompt)?;
        html.raw("</p><input type=\"file\" class=\"form-control-file\"")?;
        if kind == UploadKind::File && settings.max_files > 1 {
            html.flag("multiple")?;
        }
        if !settings.accept_types.is_empty() {
            html.attr("accept", &settings.accept())?;
        }
        html.raw(" />")
    }

    fn write_popup_trigger(html: &mut Markup, field: &FieldCore) -> fmt::Result {
        if let Some(popup) = Self::popup_id(field) {
            html.attr("data-toggle", "modal")?;
            html.attr("data-target", &format!("#{popup}"))?;
        }
        Ok(())
    }

    fn write_error(&self, html: &mut Markup) -> fmt::Result {
        if let Some(message) = &self.error {
            html.raw("<div class=\"alert alert-danger mt-2\" role=\"alert\">")?;
            html.text(message)?;
            html.raw("</div>")?;
        }
        Ok(())
    }

    fn render_files(&self, field: &FieldCore, settings: &UploadSettings) -> Result<String, FormError> {
        let mut html = Markup::new();
        html.raw("<div class=\"input-group mb-3 ml-3\"")?;
        html.attr("id", &field.ids.block)?;
        html.raw("><div class=\"table\"><div class=\"row\"><div class=\"col-sm-2\"><p>Current uploads:</p><ol class=\"mt-2\">")?;

        for name in uploaded_names(field.value_str()) {
            html.raw("<li><i class=\"fa fa-")?;
            html.raw(file_icon(name))?;
            html.raw("\"></i>")?;
            html.text(name)?;
            html.raw("</li>")?;
        }

        html.raw("</ol></div><div class=\"col-sm\">")?;
        if settings.use_external_widget {
            html.raw("<button class=\"btn btn-outline-secondary\"")?;
            html.attr("id", &field.ids.view_edit_button)?;
            Self::write_popup_trigger(&mut html, field)?;
            html.raw(" type=\"button\"><i class=\"fa fa-upload\"></i>Upload</button>")?;
        } else {
            Self::write_picker(&mut html, UploadKind::File, settings, "Upload a new file here:")?;
        }
        self.write_error(&mut html)?;
        html.raw("</div></div></div></div>")?;
        Ok(html.finish())
    }

    fn render_image(&self, field: &FieldCore, settings: &UploadSettings) -> Result<String, FormError> {
        let mut html = Markup::new();
        html.raw("<div class=\"input-group mb-3\"")?;
        html.attr("id", &field.ids.block)?;
        html.raw(">")?;

        if settings.use_external_widget {
            html.raw("<img")?;
            html.attr("src", field.value_str())?;
            html.attr("id", &field.ids.view_edit_button)?;
            Self::write_popup_trigger(&mut html, field)?;
            html.attr("style", &format!("{PREVIEW_STYLE} cursor: pointer;"))?;
            html.raw(" />")?;
            self.write_error(&mut html)?;
        } else {
            html.raw("<div class=\"table\"><div class=\"row\"><div class=\"col-sm-2\"><img")?;
            html.attr("src", field.value_str())?;
            html.attr("style", PREVIEW_STYLE)?;
            html.raw(" /></div><div class=\"col-sm\">")?;
            Self::write_picker(&mut html, UploadKind::Image, settings, "Upload a new image here:")?;
            self.write_error(&mut html)?;
            html.raw("</div></div></div>")?;
        }

        html.raw("</div>")?;
        Ok(html.finish())
    }
}

impl FieldRenderer for UploadEditor {
    fn render_view(&self, field: &FieldCore, _dom: &dyn DomPort) -> Result<String, FormError> {
        let settings = UploadSettings::from_field(field);
        match Self::kind(field) {
            UploadKind::File => self.render_files(field, &settings),
            UploadKind::Image => self.render_image(field, &settings),
        }
    }

    /// Uploads have no separate edit rendering.
    fn render_edit(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError> {
        self.render_view(field, dom)
    }
}

/// File names from a comma-separated list of upload paths.
pub fn uploaded_names(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.rsplit('/').next().unwrap_or(p))
}

/// Font Awesome icon name for a file, by extension.
pub fn file_icon(file_name: &str) -> &'static str {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return "file";
    };
    match extension.to_ascii_lowercase().as_str() {
        "zip" | "tar" | "gz" | "rar" | "7z" | "img" | "dmg" | "iso" | "z" => "file-archive",
        "doc" | "docx" | "docm" | "dot" | "dotx" => "file-word",
        "xls" | "xlsx" | "xlsm" => "file-excel",
        "ppt" | "pptx" | "pot" | "potx" => "file-powerpoint",
        "jpg" | "jpeg" | "png" | "bmp" | "gif" | "tiff" | "tif" | "tga" => "file-image",
        "wav" | "mp3" | "ogg" | "wma" => "file-audio",
        "mpg" | "mpeg" | "mp4" | "wmv" | "flv" => "file-video",
        "csv" => "file-csv",
        "txt" => "file-alt",
        "pdf" => "file-pdf",
        _ => "file",
    }
}
