//! Text rendering of the controller's visible panel.
//!
//! Exactly one panel is rendered per call, chosen by `Controller::mode`.

use std::fmt::Write;

use crate::controller::{Controller, ViewState};
use crate::llm::{VerificationResult, NOT_AVAILABLE};
use crate::upload::Preview;

const RULE: &str = "────────────────────────────────────────────────────────";

pub fn render(controller: &Controller) -> String {
    match controller.state() {
        ViewState::Idle { selection, notice } => {
            render_upload(selection.as_ref().map(|s| &s.preview), notice.as_deref())
        }
        ViewState::Loading { selection } => render_loading(&selection.preview),
        ViewState::Error { message } => render_error(message),
        ViewState::Result { selection, result } => render_result(result, Some(&selection.preview)),
    }
}

fn render_upload(preview: Option<&Preview>, notice: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verify Certificate Authenticity");
    let _ = writeln!(out, "{RULE}");
    match preview {
        Some(preview) => {
            out.push_str(&render_preview(preview));
            let _ = writeln!(out);
            let _ = writeln!(out, "Type `verify` to analyze, or `reset` to clear the file.");
        }
        None => {
            let _ = writeln!(out, "Open an image of the academic certificate (PNG, JPG, or WEBP).");
            let _ = writeln!(out, "Type `open <path>` to select a file.");
        }
    }
    if let Some(notice) = notice {
        let _ = writeln!(out);
        let _ = writeln!(out, "! {notice}");
    }
    out
}

fn render_loading(preview: &Preview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyzing Certificate...");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", preview.file_name);
    let _ = writeln!(
        out,
        "The AI is scrutinizing the document for authenticity. Please wait."
    );
    out
}

fn render_error(message: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verification Failed");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{message}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Type `reset` to try again.");
    out
}

fn render_preview(preview: &Preview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File:        {}", preview.file_name);
    let _ = writeln!(out, "Type:        {}", preview.mime);
    let _ = writeln!(out, "Size:        {}", preview.size_label());
    if let Some((w, h)) = preview.dimensions {
        let _ = writeln!(out, "Dimensions:  {w} x {h} px");
    }
    let _ = writeln!(out, "SHA-256:     {}", preview.sha256);
    out
}

/// The result card: verdict, extracted details, analysis, red flags.
pub fn render_result(result: &VerificationResult, preview: Option<&Preview>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.status.title());
    let _ = writeln!(out, "AI-powered forensic analysis completed. Status: {}", result.status);
    let _ = writeln!(out, "{RULE}");

    if let Some(preview) = preview {
        out.push_str(&render_preview(preview));
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Extracted Details");
    for (label, value) in result.details.labelled() {
        let value = if value.trim().is_empty() { NOT_AVAILABLE } else { value };
        let _ = writeln!(out, "  {:<17}{}", format!("{label}:"), value);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Analysis Report");
    for line in result.analysis.lines() {
        let _ = writeln!(out, "  {line}");
    }

    if !result.red_flags.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Potential Red Flags");
        for flag in &result.red_flags {
            let _ = writeln!(out, "  ⚠ {flag}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Type `reset` to verify another document.");
    out
}
