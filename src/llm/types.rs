//! Verification response types.
//!
//! The model answers with JSON constrained by the response schema in
//! `prompts.rs`. That JSON is first read into the loose `RawVerification`
//! shape and then validated into `VerificationResult`, so a missing or
//! malformed field is rejected instead of trusted.

use serde::{Deserialize, Serialize};

use super::provider::VerificationError;

/// Value shown for an extracted field the model could not read.
pub const NOT_AVAILABLE: &str = "N/A";

/// The overall verdict for a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    #[serde(rename = "Authentic")]
    Authentic,
    #[serde(rename = "Suspicious")]
    Suspicious,
    #[serde(rename = "Likely Forged")]
    LikelyForged,
    #[serde(rename = "Unable to Verify")]
    UnableToVerify,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Authentic,
        VerificationStatus::Suspicious,
        VerificationStatus::LikelyForged,
        VerificationStatus::UnableToVerify,
    ];

    /// The exact string used on the wire and in the response schema enum.
    pub fn wire_value(self) -> &'static str {
        match self {
            VerificationStatus::Authentic => "Authentic",
            VerificationStatus::Suspicious => "Suspicious",
            VerificationStatus::LikelyForged => "Likely Forged",
            VerificationStatus::UnableToVerify => "Unable to Verify",
        }
    }

    /// Headline for the result panel.
    pub fn title(self) -> &'static str {
        match self {
            VerificationStatus::Authentic => "Authenticity Verified",
            VerificationStatus::Suspicious => "Suspicious Document",
            VerificationStatus::LikelyForged => "High Risk of Forgery",
            VerificationStatus::UnableToVerify => "Unable to Verify",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.wire_value() == value)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_value())
    }
}

/// Fields read off the certificate. Absent values hold `NOT_AVAILABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDetails {
    pub student_name: String,
    pub university: String,
    pub degree: String,
    pub graduation_date: String,
    pub certificate_id: String,
}

impl Default for ExtractedDetails {
    fn default() -> Self {
        Self {
            student_name: NOT_AVAILABLE.to_string(),
            university: NOT_AVAILABLE.to_string(),
            degree: NOT_AVAILABLE.to_string(),
            graduation_date: NOT_AVAILABLE.to_string(),
            certificate_id: NOT_AVAILABLE.to_string(),
        }
    }
}

impl ExtractedDetails {
    /// Label/value pairs in display order.
    pub fn labelled(&self) -> [(&'static str, &str); 5] {
        [
            ("Student Name", &self.student_name),
            ("University", &self.university),
            ("Degree / Major", &self.degree),
            ("Graduation Date", &self.graduation_date),
            ("Certificate ID", &self.certificate_id),
        ]
    }
}

/// A validated verdict for one certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub details: ExtractedDetails,
    pub analysis: String,
    pub red_flags: Vec<String>,
}

impl VerificationResult {
    /// Parse and validate the JSON text returned by the model.
    pub fn from_model_json(text: &str) -> Result<Self, VerificationError> {
        let raw: RawVerification = serde_json::from_str(text.trim())?;
        raw.validate()
    }
}

// ── Loose wire shape ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerification {
    status: Option<String>,
    details: Option<RawDetails>,
    analysis: Option<String>,
    red_flags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    student_name: Option<String>,
    university: Option<String>,
    degree: Option<String>,
    graduation_date: Option<String>,
    certificate_id: Option<String>,
}

impl RawVerification {
    fn validate(self) -> Result<VerificationResult, VerificationError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => return Err(VerificationError::Incomplete("status")),
            Some(value) => VerificationStatus::from_wire(value)
                .ok_or_else(|| VerificationError::UnknownStatus(value.to_string()))?,
        };
        let details = self.details.ok_or(VerificationError::Incomplete("details"))?;
        let analysis = match self.analysis {
            Some(a) if !a.trim().is_empty() => a,
            _ => return Err(VerificationError::Incomplete("analysis")),
        };

        Ok(VerificationResult {
            status,
            details: details.into_details(),
            analysis,
            red_flags: self.red_flags.unwrap_or_default(),
        })
    }
}

impl RawDetails {
    fn into_details(self) -> ExtractedDetails {
        fn or_na(value: Option<String>) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v,
                _ => NOT_AVAILABLE.to_string(),
            }
        }
        ExtractedDetails {
            student_name: or_na(self.student_name),
            university: or_na(self.university),
            degree: or_na(self.degree),
            graduation_date: or_na(self.graduation_date),
            certificate_id: or_na(self.certificate_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"{
        "status": "Authentic",
        "details": {
            "studentName": "Jane Doe",
            "university": "Acme U",
            "degree": "B.Sc",
            "graduationDate": "2020-05-01",
            "certificateId": "X123"
        },
        "analysis": "Consistent typography and a crisp embossed seal.",
        "redFlags": []
    }"#;

    #[test]
    fn complete_response_maps_field_for_field() {
        let result = VerificationResult::from_model_json(COMPLETE).unwrap();
        assert_eq!(result.status, VerificationStatus::Authentic);
        assert_eq!(result.details.student_name, "Jane Doe");
        assert_eq!(result.details.university, "Acme U");
        assert_eq!(result.details.degree, "B.Sc");
        assert_eq!(result.details.graduation_date, "2020-05-01");
        assert_eq!(result.details.certificate_id, "X123");
        assert_eq!(
            result.analysis,
            "Consistent typography and a crisp embossed seal."
        );
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn red_flags_keep_received_order() {
        let json = r#"{"status":"Suspicious","details":{},"analysis":"x",
            "redFlags":["Blurry seal","Font mismatch"]}"#;
        let result = VerificationResult::from_model_json(json).unwrap();
        assert_eq!(result.red_flags, vec!["Blurry seal", "Font mismatch"]);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        for (json, field) in [
            (r#"{"details":{},"analysis":"x"}"#, "status"),
            (r#"{"status":"Authentic","analysis":"x"}"#, "details"),
            (r#"{"status":"Authentic","details":{}}"#, "analysis"),
            (r#"{"status":"Authentic","details":{},"analysis":"  "}"#, "analysis"),
        ] {
            match VerificationResult::from_model_json(json) {
                Err(VerificationError::Incomplete(missing)) => assert_eq!(missing, field),
                other => panic!("expected Incomplete({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn status_outside_enum_is_rejected() {
        let json = r#"{"status":"Probably Fine","details":{},"analysis":"x"}"#;
        assert!(matches!(
            VerificationResult::from_model_json(json),
            Err(VerificationError::UnknownStatus(s)) if s == "Probably Fine"
        ));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let json = r#"{"status":"Authentic","details":{},"analysis":"x","redFlags":"none"}"#;
        assert!(matches!(
            VerificationResult::from_model_json(json),
            Err(VerificationError::Malformed(_))
        ));
        assert!(matches!(
            VerificationResult::from_model_json("not json"),
            Err(VerificationError::Malformed(_))
        ));
    }

    #[test]
    fn absent_details_and_flags_fall_back_to_defaults() {
        let json = r#"{"status":"Unable to Verify","details":{"studentName":""},"analysis":"Too blurry."}"#;
        let result = VerificationResult::from_model_json(json).unwrap();
        assert_eq!(result.status, VerificationStatus::UnableToVerify);
        assert_eq!(result.details, ExtractedDetails::default());
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn serializes_with_wire_status_and_camel_case_keys() {
        let result = VerificationResult {
            status: VerificationStatus::LikelyForged,
            details: ExtractedDetails::default(),
            analysis: "Pasted signature.".to_string(),
            red_flags: vec!["Signature halo".to_string()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "Likely Forged");
        assert_eq!(json["details"]["graduationDate"], "N/A");
        assert_eq!(json["redFlags"][0], "Signature halo");
    }
}
