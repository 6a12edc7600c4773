#![allow(dead_code)]

// Shared prompt fragments. Each pipeline stage defines its own template in
// pipeline/prompts.rs; this file contains cross-cutting pieces only.

/// System prompt for all document-generation calls.
pub const DEFAULT_SYSTEM: &str = "You are an expert resume writer and career \
    strategist. Follow the formatting instructions in each request exactly. \
    Do NOT add commentary, apologies, or explanations around the requested output.";

/// Instruction appended to prompts whose output is consumed as raw LaTeX.
pub const LATEX_ONLY_INSTRUCTION: &str = "\
    Output ONLY the LaTeX fragment described above. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include any text before or after the fragment.";
