//! Drafting reports from a case's evidence with the text-generation service.
//!
//! The flow is linear and never retried: load evidence, render a fixed
//! prompt, call the generator once, return the first candidate.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{error, info};

use crate::domain::ports::{EvidenceRepository, TextGenerator};
use crate::domain::{CaseId, Error, Evidence};

const PROMPT_HEADER: &str = "Gere um laudo técnico e objetivo com base nas evidências a seguir, relacionadas ao caso";
const PROMPT_FOOTER: &str =
    "Com base nas evidências acima, elabore um laudo técnico com análise clara e objetiva.";
const MISSING_VALUE: &str = "não informado";
const COLLECTED_AT_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const GENERATION_FAILED: &str = "failed to process the text generation response";

/// Generated draft returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub case_id: CaseId,
    pub text: String,
}

/// Render the evidence of a case into the generation prompt.
///
/// Each item becomes one numbered block in the order given.
///
/// # Examples
/// ```
/// use odonto_backend::domain::{CaseId, render_report_prompt};
///
/// let case_id = CaseId::random();
/// let prompt = render_report_prompt(&case_id, &[]);
/// assert!(prompt.contains(&case_id.to_string()));
/// ```
pub fn render_report_prompt(case_id: &CaseId, evidence: &[Evidence]) -> String {
    let mut prompt = format!("{PROMPT_HEADER} '{case_id}'.\n\n");
    for (index, item) in evidence.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            prompt,
            "{number}) Nome da Evidência: {name}\n   Categoria: {category}\n   Data de Coleta: {collected}\n   Descrição: {description}\n   Local de Retirada: {location}\n   Arquivo: {file}\n\n",
            number = index + 1,
            name = item.name,
            category = item.category,
            collected = item.collected_at.format(COLLECTED_AT_FORMAT),
            description = item.description.as_deref().unwrap_or(MISSING_VALUE),
            location = item.collection_location.as_deref().unwrap_or(MISSING_VALUE),
            file = item.file_url.as_deref().unwrap_or(MISSING_VALUE),
        );
    }
    prompt.push_str(PROMPT_FOOTER);
    prompt
}

/// Report drafting use-case.
#[derive(Clone)]
pub struct ReportGenerationService {
    evidence: Arc<dyn EvidenceRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl ReportGenerationService {
    pub fn new(evidence: Arc<dyn EvidenceRepository>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            evidence,
            generator,
        }
    }

    /// Draft a report for `case_id`.
    ///
    /// Fails with `404` when the case has no evidence; the generator is not
    /// called in that case. Every other failure is logged and reported as a
    /// generic internal error.
    pub async fn generate(&self, case_id: CaseId) -> Result<GeneratedReport, Error> {
        let evidence = self.evidence.list_by_case(&case_id).await.map_err(|err| {
            error!(%case_id, error = %err, "failed to load evidence for report generation");
            Error::internal(GENERATION_FAILED)
        })?;
        if evidence.is_empty() {
            return Err(Error::not_found(format!(
                "no evidence found for case '{case_id}'"
            )));
        }

        let prompt = render_report_prompt(&case_id, &evidence);
        info!(%case_id, evidence = evidence.len(), "requesting report draft");
        match self.generator.generate(&prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => Ok(GeneratedReport { case_id, text }),
            Ok(_) => {
                error!(%case_id, "text generation returned no candidate text");
                Err(Error::internal(GENERATION_FAILED))
            }
            Err(err) => {
                error!(%case_id, error = %err, "text generation failed");
                Err(Error::internal(GENERATION_FAILED))
            }
        }
    }
}

#[cfg(test)]
#[path = "report_generation_tests.rs"]
mod tests;
