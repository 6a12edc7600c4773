//! Document templates. Section content arrives as LaTeX fragments produced by
//! the extractor; identity fields come from the catalog profile. Substitution
//! is plain token replacement, the same approach the prompt templates use.

use crate::catalog::{EducationEntry, Profile};

const RESUME_TEMPLATE: &str = r"\documentclass[letterpaper,11pt]{article}
\usepackage{latexsym}
\usepackage[empty]{fullpage}
\usepackage{titlesec}
\usepackage{marvosym}
\usepackage[usenames,dvipsnames]{color}
\usepackage{verbatim}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\usepackage{fancyhdr}
\usepackage[english]{babel}
\usepackage{tabularx}
\usepackage{fontawesome5}
\input{glyphtounicode}

\usepackage{lmodern}

\pagestyle{fancy}
\fancyhf{}
\fancyfoot{}
\renewcommand{\headrulewidth}{0pt}
\renewcommand{\footrulewidth}{0pt}
\addtolength{\oddsidemargin}{-0.5in}
\addtolength{\evensidemargin}{-0.5in}
\addtolength{\textwidth}{1in}
\addtolength{\topmargin}{-.5in}
\addtolength{\textheight}{1.0in}

\urlstyle{same}

\raggedbottom
\setlength{\tabcolsep}{0in}

\titleformat{\section}{
  \vspace{-4pt}\scshape\raggedright\large
}{}{0em}{}[\color{black}\titlerule \vspace{-5pt}]

\pdfgentounicode=1

\newcommand{\resumeItem}[1]{
  \item\small{
    #1 \vspace{0pt}
  }
}

\newcommand{\resumeSubheading}[4]{
  \vspace{-2pt}\item
    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}
      \textbf{#1} & #2 \\
      \textit{\small#3} & \textit{\small #4} \\
    \end{tabular*}\vspace{-3pt}
}

\newcommand{\resumeProjectHeading}[2]{
    \item
    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}
      \small#1 & #2 \\
    \end{tabular*}\vspace{-3pt}
}

\newcommand{\resumeSubItem}[1]{\resumeItem{#1}\vspace{0pt}}

\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}

\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}

%-------------------------------------------

\begin{document}

%----------HEADING----------%
\begin{center}
    \textbf{\Huge \scshape <<name>>} \\ \vspace{1pt}
    \faPhone \small <<phone>> \quad
    \href{mailto:<<email>>}{\faEnvelope \ \underline{<<email>>}} \quad
    \href{https://www.linkedin.com/in/<<linkedin>>}{\faLinkedin \ \underline{LinkedIn}} \quad
    \href{https://github.com/<<github>>}{\faGithub \ \underline{GitHub}} \quad
    \href{<<portfolio>>}{\faBriefcase \ \underline{Portfolio}}
\end{center}

%----------Highlight of Qualifications----------%
\section{Highlight of Qualifications}
\resumeItemListStart
<<highlights>>
\resumeItemListEnd

%-----------EXPERIENCE-----------%
\section{Experience}
\resumeSubHeadingListStart

<<experiences>>

\resumeSubHeadingListEnd

%-----------Projects-----------%
\section{Projects}
\resumeSubHeadingListStart

<<projects>>

\resumeSubHeadingListEnd

%-----------EDUCATION-----------
\section{Education}
    \resumeSubHeadingListStart

<<education>>

    \resumeSubHeadingListEnd

%-----------Technical Skills-----------
\section{Technical Skills}

<<skills>>

%-------------------------------------------
\end{document}
";

const COVER_LETTER_TEMPLATE: &str = r"\documentclass[10pt,letter]{letter}
\usepackage[utf8]{inputenc}

\RequirePackage[T1]{fontenc}
\RequirePackage[default,semibold]{sourcesanspro}
\RequirePackage[12pt]{moresize}
\usepackage{anyfontsize}
\RequirePackage{csquotes}

\RequirePackage[margin=.5in]{geometry}
\setlength{\parskip}{1em}

\RequirePackage{xcolor}

\RequirePackage{hyperref}
\hypersetup{colorlinks=true,urlcolor=accent}

\pagenumbering{gobble}

\RequirePackage[english]{babel}

\def\name{<<name>>}
\signature{\name}
\address{<<address>>}
\def\phone{<<phone>>}
\def\email{<<email>>}
\def\LinkedIn{<<linkedin>>}
\def\github{<<github>>}
\def\role{ <<position>> }

\RequirePackage{fancyhdr}
\fancypagestyle{plain}{
\fancyhf{}
\lhead{\phone \\
	    \href{mailto:\email}{\email}}
	\chead{
	    \centering {\Large \textbf\name} \\
	    {\color{accent} \large{\role}}}
	    \rhead{
	    Portfolio: \href{<<portfolio>>}{\portfoliohost}\\
	    \href{https://github.com/\github}{github.com/\github} \\
	    \href{https://www.linkedin.com/in/\LinkedIn}{linkedin.com/in/\LinkedIn}}
\renewcommand{\headrulewidth}{2pt}
\renewcommand{\headrule}{\hbox to\headwidth{
  \color{accent}\leaders\hrule height \headrulewidth\hfill}}
}
\pagestyle{plain}

\setlength{\headheight}{90pt}
\setlength{\headsep}{0pt}

\makeatletter
\let\ps@empty\ps@plain
\let\ps@firstpage\ps@plain
\makeatother

\def\portfoliohost{<<portfoliohost>>}

\begin{document}
\definecolor{accent}{RGB}{61, 90, 128}
\begin{letter}{
Hiring Team \\
<<position>> \\
<<company>> }

\opening{Dear Hiring Team,}

\setlength\parindent{.5in}

<<body>>

\closing{Sincerely,}
\end{letter}

\end{document}
";

/// Renders the full résumé source from the profile and the four generated
/// section fragments.
pub fn render_resume(
    profile: &Profile,
    highlights: &str,
    experiences: &str,
    skills: &str,
    projects: &str,
) -> String {
    RESUME_TEMPLATE
        .replace("<<name>>", &profile.name)
        .replace("<<phone>>", &profile.phone)
        .replace("<<email>>", &profile.email)
        .replace("<<linkedin>>", &profile.linkedin)
        .replace("<<github>>", &profile.github)
        .replace("<<portfolio>>", &profile.portfolio)
        .replace("<<highlights>>", highlights)
        .replace("<<experiences>>", experiences)
        .replace("<<projects>>", projects)
        .replace("<<education>>", &render_education(&profile.education))
        .replace("<<skills>>", skills)
}

/// Renders the cover-letter source around a generated body.
pub fn render_cover_letter(
    profile: &Profile,
    position: &str,
    company: &str,
    body: &str,
) -> String {
    COVER_LETTER_TEMPLATE
        .replace("<<name>>", &profile.name)
        .replace("<<address>>", &profile.address_lines.join("\\\\\n"))
        .replace("<<phone>>", &profile.phone)
        .replace("<<email>>", &profile.email)
        .replace("<<linkedin>>", &profile.linkedin)
        .replace("<<github>>", &profile.github)
        .replace("<<portfolio>>", &profile.portfolio)
        .replace("<<portfoliohost>>", portfolio_host(&profile.portfolio))
        .replace("<<position>>", position)
        .replace("<<company>>", company)
        .replace("<<body>>", body)
}

fn render_education(entries: &[EducationEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let mut block = format!(
                "    \\resumeSubheading\n    {{{}}}{{{}}}\n    {{{}}}{{{}}}",
                e.institution, e.dates, e.degree, e.location
            );
            if !e.details.is_empty() {
                let items = e
                    .details
                    .iter()
                    .map(|d| format!("        \\resumeItem{{{d}}}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                block.push_str(&format!(
                    "\n    \\resumeItemListStart\n{items}\n    \\resumeItemListEnd"
                ));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Display form of the portfolio URL for the letterhead.
fn portfolio_host(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: "Jordan Doe".to_string(),
            email: "jordan@example.com".to_string(),
            phone: "555-0100".to_string(),
            address_lines: vec!["1 Main St".to_string(), "Springfield".to_string()],
            linkedin: "jordandoe".to_string(),
            github: "jordandoe".to_string(),
            portfolio: "https://jordandoe.dev".to_string(),
            education: vec![EducationEntry {
                institution: "State University".to_string(),
                degree: "BSc Computer Science".to_string(),
                dates: "2016 -- 2020".to_string(),
                location: "Springfield".to_string(),
                details: vec!["Graduated with honours".to_string()],
            }],
        }
    }

    #[test]
    fn test_resume_contains_all_sections() {
        let source = render_resume(
            &profile(),
            "\\resumeItem{highlight}",
            "\\resumeSubheading{Acme}{2020}{Engineer}{Remote}",
            "\\begin{itemize}[leftmargin=0.15in, label={}]\\small{\\item{skills}}\\end{itemize}",
            "\\resumeProjectHeading{proj}{}",
        );
        assert!(source.contains("Jordan Doe"));
        assert!(source.contains("\\resumeItem{highlight}"));
        assert!(source.contains("Acme"));
        assert!(source.contains("State University"));
        assert!(source.contains("Graduated with honours"));
        assert!(!source.contains("<<"), "all placeholders substituted");
    }

    #[test]
    fn test_cover_letter_addresses_company_and_role() {
        let source = render_cover_letter(
            &profile(),
            "Platform Engineer",
            "Acme Corp",
            "I would like to apply.",
        );
        assert!(source.contains("Platform Engineer"));
        assert!(source.contains("Acme Corp"));
        assert!(source.contains("I would like to apply."));
        assert!(source.contains("jordandoe.dev"));
        assert!(!source.contains("<<"), "all placeholders substituted");
    }

    #[test]
    fn test_education_without_details_has_no_item_list() {
        let rendered = render_education(&[EducationEntry {
            institution: "Tech Institute".to_string(),
            degree: "MSc".to_string(),
            dates: "2020 -- 2022".to_string(),
            location: "Remote".to_string(),
            details: vec![],
        }]);
        assert!(rendered.contains("Tech Institute"));
        assert!(!rendered.contains("\\resumeItemListStart"));
    }
}
