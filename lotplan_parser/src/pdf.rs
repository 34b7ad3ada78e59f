use anyhow::Context;

/// Extracts raw text from an uploaded PDF. Scanned documents come back as
/// whatever the embedded text layer holds; the token scanner downstream is
/// expected to cope with the noise.
pub fn extract_text(pdf_bytes: &[u8]) -> anyhow::Result<String> {
    pdf_extract::extract_text_from_mem(pdf_bytes).context("Failed to extract pdf to text")
}
