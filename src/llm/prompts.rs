//! Verification prompt and response schema.
//!
//! These two constants are the contract with the model. The schema enum
//! must list exactly the wire values of `VerificationStatus`.

use super::types::VerificationStatus;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const TEMPERATURE: f64 = 0.2;

/// Forensic instruction sent ahead of the certificate image.
pub const VERIFY_PROMPT: &str = r#"You are an expert academic document fraud investigator with years of experience in forensic analysis. Your task is to meticulously analyze the provided university certificate image.

Instructions:
1. **Extract Key Information**: Carefully extract the student's name, university name, degree title, graduation date, and any unique certificate ID. If a field is not present, return 'N/A'.
2. **Forensic Analysis**: Scrutinize the document for any signs of forgery or tampering. Pay close attention to:
   - **Typography**: Inconsistent fonts, sizes, or spacing. Misspellings or grammatical errors.
   - **Alignment**: Misaligned text blocks, logos, or signatures.
   - **Seals & Logos**: Blurry, pixelated, or digitally manipulated university seals or logos.
   - **Signatures**: Unnatural-looking or digitally inserted signatures.
   - **Layout & Formatting**: Unprofessional layout, unusual margins, or inconsistent formatting compared to standard academic certificates.
3. **Verdict**: Based on your analysis, provide a verification status: 'Authentic' if it appears completely legitimate, 'Suspicious' if there are minor inconsistencies that warrant further checks, 'Likely Forged' if there are clear and multiple signs of tampering, or 'Unable to Verify' if the image quality is too low for a proper analysis.
4. **Reporting**: Generate a detailed report in the specified JSON format, outlining your findings, the extracted details, and a list of specific red flags."#;

/// Prompt used by `test-connection`; any 2xx answer counts.
pub const PING_PROMPT: &str = "Reply with just: ok";

/// `responseSchema` for `generationConfig` (Gemini OpenAPI subset).
pub fn response_schema() -> serde_json::Value {
    let statuses: Vec<&str> = VerificationStatus::ALL
        .iter()
        .map(|s| s.wire_value())
        .collect();

    let field = |description: &str| {
        serde_json::json!({
            "type": "STRING",
            "description": format!("{description} Return 'N/A' if not found."),
        })
    };

    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "enum": statuses,
                "description": "The overall verification status of the certificate."
            },
            "details": {
                "type": "OBJECT",
                "properties": {
                    "studentName": field("Full name of the student."),
                    "university": field("Name of the issuing university or institution."),
                    "degree": field("The degree or qualification awarded."),
                    "graduationDate": field("Date of graduation or issuance."),
                    "certificateId": field("Unique certificate or serial number."),
                },
                "required": ["studentName", "university", "degree", "graduationDate", "certificateId"]
            },
            "analysis": {
                "type": "STRING",
                "description": "A detailed, professional analysis of the document's authenticity, explaining the reasoning behind the status verdict. Cover aspects like layout, fonts, seals, and signatures."
            },
            "redFlags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of specific potential issues or inconsistencies found, such as 'Inconsistent font usage' or 'Blurry university seal'. Return an empty array if no issues are found."
            }
        },
        "required": ["status", "details", "analysis", "redFlags"]
    })
}
