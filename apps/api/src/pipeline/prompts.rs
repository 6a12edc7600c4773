// Prompt templates for the generative stages. Placeholders are substituted
// with plain token replacement before the call; the cross-cutting fragments
// live in llm_client::prompts.

/// Experience generation. Replace `{job}` and `{experiences}`.
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer specializing in tailoring professional experiences to specific job requirements.

Analyze the job posting and the candidate's experiences, then generate LaTeX-formatted resume entries that highlight the most relevant skills, achievements, and experiences for the target position.

JOB POSTING:
{job}

CANDIDATE EXPERIENCES:
{experiences}

INSTRUCTIONS:
1. Identify the key requirements, skills, technologies, and qualifications in the job posting
2. Select the 3-4 most relevant experiences from the candidate's background
3. For each selected experience, generate a LaTeX resume entry following this EXACT format:

\resumeSubheading
    {Organization Name}{Start Date -- End Date}
    {Job Title}{Location}
    \resumeItemListStart
        \resumeItem{Achievement highlighting relevant skills with \textbf{bold keywords}}
        \resumeItem{Achievement highlighting relevant skills with \textbf{bold keywords}}
        \resumeItem{Achievement highlighting relevant skills with \textbf{bold keywords}}
    \resumeItemListEnd

FORMATTING GUIDELINES:
- Use \textbf{} to bold technologies, methodologies, and achievements mentioned in the job posting
- Start each \resumeItem with a strong action verb (Developed, Implemented, Designed, Led, Accelerated)
- Quantify achievements with numbers and percentages where available (write \% for percentages)
- Tailor the language to the job posting's terminology
- Focus on impact and results, not just responsibilities
- Maximum 5 resume items per experience
- Order experiences by relevance to the job posting

Generate the LaTeX resume entries for the most relevant experiences:"#;

/// Skills selection. Replace `{job}` and `{skills}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer specializing in tailoring technical skills sections to specific job requirements.

Start with the candidate's full skill set and remove only those skills that are clearly irrelevant to the job, keeping a broad and well-rounded technical skills section.

JOB POSTING:
{job}

CANDIDATE'S TECHNICAL SKILLS:
{skills}

INSTRUCTIONS:
1. Identify the required and preferred technologies, frameworks, and tools in the job posting.
2. Within each category, prioritize direct matches from the posting, then high expertise (score >= 6), then complementary skills.
3. Keep at least 4-5 skills per category where the candidate has them; cap each category at 8-10.
4. Do not include expertise scores in the output.

OUTPUT FORMAT — generate a LaTeX technical skills section in this exact shape:

\begin{itemize}[leftmargin=0.15in, label={}]
\small{\item{
    \textbf{Category Name}{: skill, skill, skill} \\
    \textbf{Category Name}{: skill, skill, skill}
}}
\end{itemize}

FORMATTING RULES:
- Only omit a category if the candidate truly has nothing relevant in it.
- Within categories, sort skills by relevance to the job posting.
- Use LaTeX escaping (\& for ampersands).
- Output ONLY the LaTeX block, nothing else.

Now generate the LaTeX technical skills section:"#;

/// Project selection. Replace `{job}` and `{projects}`.
pub const PROJECT_SELECTION_PROMPT_TEMPLATE: &str = r#"You are an expert resume strategist specializing in project selection for job applications.

Analyze the job posting and select up to 4 projects from the candidate's portfolio that best demonstrate the skills and experience required for the position.

JOB POSTING:
{job}

CANDIDATE'S PROJECTS:
{projects}

SELECTION CRITERIA (in order of importance):
1. Direct technology and framework matches with the job requirements
2. Problem-domain alignment with the job's industry
3. Complexity appropriate for the role's seniority
4. End-to-end ownership and unique technical solutions
5. Complementary coverage — the selected set should span the posting's requirements
6. Selecting fewer than 4 (even one) is fine, as long as every selected project is relevant.

OUTPUT FORMAT:
Return ONLY a JSON list of the selected project titles, ordered by relevance to the job posting.

Example format:
["Project Title 1", "Project Title 2", "Project Title 3"]

Important: Return ONLY the JSON list, no additional text or explanation."#;

/// Per-project summary. Replace `{job}`, `{project_title}`,
/// `{project_description}`, `{project_stack}`, `{project_docs}`, `{github}`.
pub const PROJECT_SUMMARY_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer specializing in compelling project descriptions for technical resumes.

Analyze the job posting and the project details, then generate a LaTeX-formatted project entry highlighting the aspects most relevant to the target position.

JOB POSTING:
{job}

PROJECT DETAILS:
Title: {project_title}
Description: {project_description}
Tech Stack: {project_stack}

Detailed Documentation:
{project_docs}

INSTRUCTIONS:
1. From the project's tech stack, select the 4-6 technologies MOST relevant to the job requirements
2. Extract the most relevant achievements and technical details
3. Be honest about the project — do not invent capabilities because the job posting asks for them
4. Generate a LaTeX project entry following this EXACT format:

\resumeProjectHeading
    {\textbf{{project_title}} $|$ \emph{selected technologies} $|$ \href{{github}}{\underline{Code}}} {}
    \resumeItemListStart
        \resumeItem{Key achievement with \textbf{bold keywords}}
        \resumeItem{Technical implementation detail with \textbf{bold keywords}}
        \resumeItem{Impact with quantified metrics where possible}
    \resumeItemListEnd

FORMATTING GUIDELINES:
- Bold terms the job posting mentions using \textbf{}
- Use \% for percentages and \& for ampersands
- Use strong action verbs (Built, Developed, Implemented, Integrated, Designed)
- Keep each \resumeItem to 1-2 lines; generate exactly 3 \resumeItem entries

Generate the LaTeX project entry:"#;

/// Highlights synthesis. Replace `{job}`, `{experiences}`, `{skills}`, `{projects}`.
pub const HIGHLIGHTS_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer creating a "Highlight of Qualifications" section that synthesizes a candidate's experiences, skills, and projects into powerful qualification statements.

Analyze the job posting and all resume content below, then generate a LaTeX highlights section that positions the candidate as the ideal fit for the role.

JOB POSTING:
{job}

CANDIDATE'S EXPERIENCES:
{experiences}

CANDIDATE'S TECHNICAL SKILLS:
{skills}

CANDIDATE'S PROJECTS:
{projects}

INSTRUCTIONS:
1. Identify the most critical qualifications in the job posting
2. Synthesize the candidate's content into 5-7 qualification highlights
3. Follow this EXACT format, one \resumeItem per highlight:

\resumeItem{\textbf{Domain Area:} Statement showcasing relevant expertise with \textbf{key technologies} and demonstrable outcomes.}

EXAMPLE:
\resumeItem{\textbf{Machine Learning \& AI:} 5+ years developing \textbf{deep learning} models with \textbf{PyTorch}, improving accuracy by 95\%.}

FORMATTING GUIDELINES:
- Each highlight starts with a bolded domain area that matches a job requirement
- Bold all technologies and methodologies with \textbf{}
- Quantify where possible (use \% for percentages, \& for ampersands)
- 1-2 lines per highlight, ordered by importance to the job posting

Generate the LaTeX highlight of qualifications:"#;

/// Cover letter drawing on the freshly generated résumé sections.
/// Replace `{position}`, `{company}`, `{job}`, `{highlights}`,
/// `{experiences}`, `{skills}`, `{project_summaries}`, `{context}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career writer crafting a tailored cover letter body.

Write the body paragraphs of a cover letter for the position below, drawing only on the resume content and supporting context provided.

POSITION: {position}
COMPANY: {company}

JOB POSTING:
{job}

RESUME HIGHLIGHTS:
{highlights}

RESUME EXPERIENCES:
{experiences}

RESUME TECHNICAL SKILLS:
{skills}

RESUME PROJECTS:
{project_summaries}

SUPPORTING CONTEXT (past letters, papers, and project notes):
{context}

INSTRUCTIONS:
1. Write 3-4 body paragraphs only — no date, no address block, no "Dear ...", no closing or signature (the surrounding letter template provides those)
2. Open by connecting the candidate's strongest qualification to the company's stated need
3. Ground every claim in the resume content or the supporting context — do not invent facts
4. Mirror the job posting's terminology naturally; never keyword-stuff
5. Use plain LaTeX-safe text: \& for ampersands, \% for percentages; emphasize sparingly with \textbf{}
6. Keep the letter under 400 words, confident and specific in tone

Write the cover letter body:"#;

/// Cover letter in cover-letter-only mode, drawing on an existing résumé.
/// Replace `{position}`, `{company}`, `{job}`, `{resume}`, `{context}`.
pub const COVER_LETTER_FROM_RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert career writer crafting a tailored cover letter body.

Write the body paragraphs of a cover letter for the position below, drawing only on the candidate's existing resume and the supporting context provided.

POSITION: {position}
COMPANY: {company}

JOB POSTING:
{job}

CANDIDATE'S RESUME:
{resume}

SUPPORTING CONTEXT (past letters, papers, and project notes):
{context}

INSTRUCTIONS:
1. Write 3-4 body paragraphs only — no date, no address block, no "Dear ...", no closing or signature (the surrounding letter template provides those)
2. Open by connecting the candidate's strongest qualification to the company's stated need
3. Ground every claim in the resume or the supporting context — do not invent facts
4. Mirror the job posting's terminology naturally; never keyword-stuff
5. Use plain LaTeX-safe text: \& for ampersands, \% for percentages; emphasize sparingly with \textbf{}
6. Keep the letter under 400 words, confident and specific in tone

Write the cover letter body:"#;
